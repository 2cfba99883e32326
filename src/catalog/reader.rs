//! Loading catalogs from storage.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::config::CatalogConfig;
use crate::catalog::format::CatalogHeader;
use crate::catalog::record::SegmentRecord;
use crate::catalog::segment_catalog::SegmentCatalog;
use crate::error::Result;
use crate::storage::{Storage, StorageInput, StructReader};
use crate::util::{Clock, SystemClock};

/// Smallest possible encoded record: empty name length plus document count.
const MIN_RECORD_BYTES: u64 = 8;

/// Reads the published catalog, in either the legacy or the versioned encoding.
#[derive(Debug, Clone)]
pub struct CatalogReader {
    storage: Arc<dyn Storage>,
    config: CatalogConfig,
    clock: Arc<dyn Clock>,
}

impl CatalogReader {
    /// Create a reader over `storage` with the default file names and the
    /// system clock.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_config(storage, CatalogConfig::default())
    }

    /// Create a reader with explicit configuration.
    pub fn with_config(storage: Arc<dyn Storage>, config: CatalogConfig) -> Self {
        CatalogReader {
            storage,
            config,
            clock: Arc::new(SystemClock::new()),
        }
    }

    /// Replace the clock used to stamp legacy catalogs that carry no version.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Load the canonical catalog.
    pub fn load(&self) -> Result<SegmentCatalog> {
        Ok(self.load_with_header()?.1)
    }

    /// Load the canonical catalog together with the header it was decoded
    /// from. Both come from one open of the file, so they always describe the
    /// same generation.
    pub fn load_with_header(&self) -> Result<(CatalogHeader, SegmentCatalog)> {
        let input = self.storage.open_input(&self.config.segments_file)?;
        self.read_with_header_from(input)
    }

    /// Decode a catalog from an open stream. The stream is closed whether or
    /// not decoding succeeds.
    pub fn read_from<R: StorageInput>(&self, input: R) -> Result<SegmentCatalog> {
        Ok(self.read_with_header_from(input)?.1)
    }

    /// Like [`read_from`](Self::read_from), also returning the header.
    pub fn read_with_header_from<R: StorageInput>(
        &self,
        input: R,
    ) -> Result<(CatalogHeader, SegmentCatalog)> {
        let mut reader = StructReader::new(input)?;
        let decoded = self.decode(&mut reader);
        let closed = reader.close();

        let decoded = decoded?;
        closed?;
        Ok(decoded)
    }

    fn decode<R: StorageInput>(
        &self,
        reader: &mut StructReader<R>,
    ) -> Result<(CatalogHeader, SegmentCatalog)> {
        let header = CatalogHeader::read(reader)?;

        // A count of zero or less lists no segments.
        let count = reader.read_i32()?.max(0);

        // Cap the allocation by what the file could actually hold.
        let capacity = (count as u64).min(reader.remaining() / MIN_RECORD_BYTES);
        let mut records = Vec::with_capacity(capacity as usize);
        for _ in 0..count {
            let name = reader.read_string()?;
            let doc_count = reader.read_i32()?;
            records.push(SegmentRecord::new(name, doc_count));
        }

        let version = match header.version() {
            Some(version) => {
                if !reader.is_eof() {
                    debug!(
                        trailing = reader.remaining(),
                        "ignoring bytes after versioned catalog"
                    );
                }
                version
            }
            // The legacy layout only tells us whether a version follows once
            // the whole record list has been consumed.
            None if reader.is_eof() => {
                let version = self.clock.now_millis();
                debug!(version, "legacy catalog without version, stamped from clock");
                version
            }
            None => reader.read_i64()?,
        };

        debug!(
            encoding = header.encoding(),
            segments = records.len(),
            counter = header.counter(),
            version,
            "loaded segment catalog"
        );

        let catalog = SegmentCatalog::from_parts(header.counter(), version, records);
        Ok((header, catalog))
    }
}
