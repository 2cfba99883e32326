//! Publishing a new catalog generation.
//!
//! A commit writes the whole catalog to the staging file, syncs and closes it,
//! and then renames it over the canonical name. The rename is the commit
//! point: before it the previous generation is still the published one, after
//! it the new one is. The previous catalog is never deleted by the writer.

use std::io::Write;
use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::config::CatalogConfig;
use crate::catalog::format::FORMAT;
use crate::catalog::segment_catalog::SegmentCatalog;
use crate::error::{Result, SegcatError};
use crate::storage::{Storage, StructWriter};

/// Commits catalogs to storage. Only one commit per canonical name may be in
/// flight at a time.
#[derive(Debug, Clone)]
pub struct CatalogWriter {
    storage: Arc<dyn Storage>,
    config: CatalogConfig,
}

impl CatalogWriter {
    /// Create a writer over `storage` with the default file names.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_config(storage, CatalogConfig::default())
    }

    /// Create a writer with explicit configuration.
    pub fn with_config(storage: Arc<dyn Storage>, config: CatalogConfig) -> Self {
        CatalogWriter { storage, config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Publish `catalog` as the next generation.
    ///
    /// The written version is the catalog's version plus one, even when no
    /// segment changed. The in-memory version is advanced once the rename has
    /// gone through; if any step before it fails, the catalog is left as it was
    /// and a stale staging file may remain in storage.
    pub fn commit(&self, catalog: &mut SegmentCatalog) -> Result<()> {
        self.config.validate()?;

        let next = catalog
            .version()
            .checked_add(1)
            .ok_or_else(|| SegcatError::invalid_operation("commit version overflow"))?;

        let staging = &self.config.staging_file;
        let output = self.storage.create_output(staging)?;
        let mut writer = StructWriter::new(output);
        write_catalog(&mut writer, catalog, next)?;
        let bytes = writer.position();
        writer.close()?;
        debug!(file = %staging, bytes, "staged segment catalog");

        self.storage
            .rename_file(staging, &self.config.segments_file)?;
        catalog.set_version(next);

        if self.config.sync_directory {
            self.storage.sync()?;
        }

        info!(
            version = next,
            segments = catalog.len(),
            counter = catalog.counter(),
            "committed segment catalog"
        );
        Ok(())
    }

    /// The exact bytes a commit of `catalog` at `version` writes.
    pub fn encode(catalog: &SegmentCatalog, version: i64) -> Result<Vec<u8>> {
        let mut writer = StructWriter::new(Vec::new());
        write_catalog(&mut writer, catalog, version)?;
        writer.into_inner()
    }
}

fn write_catalog<W: Write>(
    writer: &mut StructWriter<W>,
    catalog: &SegmentCatalog,
    version: i64,
) -> Result<()> {
    let count = i32::try_from(catalog.len())
        .map_err(|_| SegcatError::invalid_argument("too many segments for one catalog"))?;

    writer.write_i32(FORMAT)?;
    writer.write_i64(version)?;
    writer.write_i32(catalog.counter())?;
    writer.write_i32(count)?;
    for record in catalog {
        writer.write_string(record.name())?;
        writer.write_i32(record.doc_count())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::reader::CatalogReader;
    use crate::catalog::record::SegmentRecord;
    use crate::storage::MemoryStorage;

    fn example_catalog() -> SegmentCatalog {
        SegmentCatalog::from_parts(
            2,
            5,
            vec![SegmentRecord::new("_0", 100), SegmentRecord::new("_1", 50)],
        )
    }

    #[test]
    fn test_encode_layout() {
        let bytes = CatalogWriter::encode(&example_catalog(), 6).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&(-1i32).to_be_bytes());
        expected.extend_from_slice(&6i64.to_be_bytes());
        expected.extend_from_slice(&2i32.to_be_bytes());
        expected.extend_from_slice(&2i32.to_be_bytes());
        expected.extend_from_slice(&2i32.to_be_bytes());
        expected.extend_from_slice(b"_0");
        expected.extend_from_slice(&100i32.to_be_bytes());
        expected.extend_from_slice(&2i32.to_be_bytes());
        expected.extend_from_slice(b"_1");
        expected.extend_from_slice(&50i32.to_be_bytes());

        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_commit_publishes_next_version() {
        let storage = Arc::new(MemoryStorage::new_default());
        let writer = CatalogWriter::new(storage.clone());
        let mut catalog = example_catalog();

        writer.commit(&mut catalog).unwrap();

        assert_eq!(catalog.version(), 6);
        assert!(!storage.file_exists("segments.new"));
        assert_eq!(
            storage.read_all("segments").unwrap(),
            CatalogWriter::encode(&catalog, 6).unwrap()
        );

        let loaded = CatalogReader::new(storage).load().unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_unchanged_catalog_still_advances() {
        let storage = Arc::new(MemoryStorage::new_default());
        let writer = CatalogWriter::new(storage);
        let mut catalog = SegmentCatalog::new();

        for expected in 1..=3 {
            writer.commit(&mut catalog).unwrap();
            assert_eq!(catalog.version(), expected);
        }
    }

    #[test]
    fn test_commit_with_custom_names() {
        let storage = Arc::new(MemoryStorage::new_default());
        let config = CatalogConfig {
            segments_file: "catalog".to_string(),
            staging_file: "catalog.tmp".to_string(),
            sync_directory: false,
        };
        let writer = CatalogWriter::with_config(storage.clone(), config);
        let mut catalog = example_catalog();
        writer.commit(&mut catalog).unwrap();

        assert_eq!(storage.list_files().unwrap(), vec!["catalog"]);
    }

    #[test]
    fn test_invalid_config_rejected_before_writing() {
        let storage = Arc::new(MemoryStorage::new_default());
        let config = CatalogConfig {
            staging_file: "segments".to_string(),
            ..Default::default()
        };
        let writer = CatalogWriter::with_config(storage.clone(), config);
        let mut catalog = example_catalog();

        assert!(writer.commit(&mut catalog).is_err());
        assert_eq!(catalog.version(), 5);
        assert_eq!(storage.file_count(), 0);
    }

    #[test]
    fn test_version_overflow() {
        let storage = Arc::new(MemoryStorage::new_default());
        let writer = CatalogWriter::new(storage.clone());
        let mut catalog = SegmentCatalog::from_parts(0, i64::MAX, Vec::new());

        let err = writer.commit(&mut catalog).unwrap_err();
        assert!(matches!(err, SegcatError::InvalidOperation(_)));
        assert_eq!(catalog.version(), i64::MAX);
        assert_eq!(storage.file_count(), 0);
    }
}
