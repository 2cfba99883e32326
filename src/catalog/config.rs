//! Configuration for catalog readers and writers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::format::{SEGMENTS_FILE, STAGING_FILE};
use crate::error::{Result, SegcatError};

/// Names and durability settings used when loading and committing catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Canonical name of the published catalog.
    pub segments_file: String,

    /// Name the next generation is written under before it is renamed into place.
    pub staging_file: String,

    /// Sync the storage after the rename so the new generation survives a crash.
    pub sync_directory: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            segments_file: SEGMENTS_FILE.to_string(),
            staging_file: STAGING_FILE.to_string(),
            sync_directory: true,
        }
    }
}

impl CatalogConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        let config: CatalogConfig = serde_json::from_slice(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the file names are usable for a staged commit.
    pub fn validate(&self) -> Result<()> {
        if self.segments_file.is_empty() || self.staging_file.is_empty() {
            return Err(SegcatError::invalid_config("catalog file names must not be empty"));
        }
        if self.segments_file == self.staging_file {
            return Err(SegcatError::invalid_config(format!(
                "staging file must differ from segments file ({})",
                self.segments_file
            )));
        }
        Ok(())
    }
}
