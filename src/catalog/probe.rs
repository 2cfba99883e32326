//! Reading just the commit version of the published catalog.
//!
//! A versioned catalog stores its version in the header, so the probe stops
//! after 16 bytes. A legacy catalog stores it (if at all) after the record
//! list, whose length is only known by walking it, so the probe falls back to
//! a full load.

use tracing::trace;

use crate::catalog::format::CatalogHeader;
use crate::catalog::reader::CatalogReader;
use crate::error::Result;
use crate::storage::{StorageInput, StructReader};

impl CatalogReader {
    /// The version of the canonical catalog, read without decoding its records
    /// whenever the encoding allows it.
    pub fn peek_version(&self) -> Result<i64> {
        let name = &self.config().segments_file;
        let input = self.storage().open_input(name)?;
        match Self::peek_header(input)? {
            Some(version) => Ok(version),
            None => {
                trace!("legacy catalog, falling back to a full load for its version");
                Ok(self.load()?.version())
            }
        }
    }

    /// The version stored in an open stream. Legacy streams are decoded in
    /// full from `fallback`, a second stream over the same bytes.
    pub fn peek_version_from<R, F>(&self, input: R, fallback: F) -> Result<i64>
    where
        R: StorageInput,
        F: FnOnce() -> Result<R>,
    {
        match Self::peek_header(input)? {
            Some(version) => Ok(version),
            None => Ok(self.read_from(fallback()?)?.version()),
        }
    }

    /// Read the header and close the stream; `None` means the stream is legacy.
    fn peek_header<R: StorageInput>(input: R) -> Result<Option<i64>> {
        let mut reader = StructReader::new(input)?;
        let header = CatalogHeader::read(&mut reader);
        let closed = reader.close();

        let header = header?;
        closed?;
        Ok(header.version())
    }
}
