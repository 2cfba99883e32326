//! Command implementations for the segcat CLI.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::catalog::{CatalogConfig, CatalogReader, CatalogWriter, SegmentCatalog};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::storage::{FileStorage, Storage, StorageConfig};
use crate::util::SystemClock;

/// Execute a CLI command.
pub fn execute_command(args: SegcatArgs) -> Result<()> {
    let config = load_config(&args)?;
    match &args.command {
        Command::Inspect(inspect_args) => inspect_catalog(inspect_args, &config, &args),
        Command::Version(version_args) => show_version(version_args, &config, &args),
        Command::Commit(commit_args) => commit_catalog(commit_args, &config, &args),
    }
}

fn load_config(args: &SegcatArgs) -> Result<CatalogConfig> {
    match &args.config {
        Some(path) => CatalogConfig::from_json_file(path),
        None => Ok(CatalogConfig::default()),
    }
}

/// Open the index directory. Only `create` may bring a missing one into being.
fn open_storage(index_path: &Path, create: bool) -> Result<Arc<dyn Storage>> {
    let storage = if create {
        FileStorage::new(index_path, StorageConfig::default())?
    } else {
        FileStorage::open(index_path, StorageConfig::default())?
    };
    Ok(Arc::new(storage))
}

/// Show every segment listed in the catalog.
fn inspect_catalog(args: &InspectArgs, config: &CatalogConfig, cli_args: &SegcatArgs) -> Result<()> {
    let storage = open_storage(&args.index_path, false)?;

    let (header, catalog) =
        CatalogReader::with_config(storage, config.clone()).load_with_header()?;

    output_result(
        "Segment catalog",
        &CatalogSummary {
            path: args.index_path.to_string_lossy().to_string(),
            encoding: header.encoding().to_string(),
            version: catalog.version(),
            counter: catalog.counter(),
            segment_count: catalog.len(),
            total_documents: catalog.total_documents(),
            segments: catalog.records().to_vec(),
        },
        cli_args,
    )
}

/// Print the catalog version without decoding more than needed.
fn show_version(args: &VersionArgs, config: &CatalogConfig, cli_args: &SegcatArgs) -> Result<()> {
    let storage = open_storage(&args.index_path, false)?;
    let version = CatalogReader::with_config(storage, config.clone()).peek_version()?;

    output_result(
        "Catalog version",
        &VersionResult {
            path: args.index_path.to_string_lossy().to_string(),
            version,
        },
        cli_args,
    )
}

/// Republish the catalog as the next generation.
fn commit_catalog(args: &CommitArgs, config: &CatalogConfig, cli_args: &SegcatArgs) -> Result<()> {
    let storage = open_storage(&args.index_path, args.init)?;
    let reader = CatalogReader::with_config(storage.clone(), config.clone());

    let (mut catalog, previous_version) = match reader.load() {
        Ok(catalog) => {
            let version = catalog.version();
            (catalog, Some(version))
        }
        Err(e) if args.init && e.is_not_found() => {
            info!(path = %args.index_path.display(), "no catalog found, starting a new one");
            (SegmentCatalog::with_clock(&SystemClock::new()), None)
        }
        Err(e) => return Err(e),
    };

    CatalogWriter::with_config(storage, config.clone()).commit(&mut catalog)?;

    output_result(
        "Catalog committed",
        &CommitResult {
            path: args.index_path.to_string_lossy().to_string(),
            previous_version,
            version: catalog.version(),
            segment_count: catalog.len(),
        },
        cli_args,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn run(args: &[&str]) -> Result<()> {
        let mut full = vec!["segcat", "--quiet"];
        full.extend_from_slice(args);
        execute_command(SegcatArgs::try_parse_from(full).unwrap())
    }

    #[test]
    fn test_commit_init_then_inspect() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_str().unwrap();

        assert!(run(&["inspect", path]).unwrap_err().is_not_found());
        assert!(run(&["commit", path]).unwrap_err().is_not_found());

        run(&["commit", path, "--init"]).unwrap();
        run(&["commit", path]).unwrap();
        run(&["inspect", path, "--format", "json"]).unwrap();
        run(&["version", path]).unwrap();

        let storage: Arc<dyn Storage> =
            Arc::new(FileStorage::new(dir.path(), StorageConfig::default()).unwrap());
        let reader = CatalogReader::new(storage);
        let catalog = reader.load().unwrap();
        assert!(catalog.is_empty());
        assert_eq!(reader.peek_version().unwrap(), catalog.version());
    }

    #[test]
    fn test_commit_advances_existing_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_str().unwrap();
        let storage: Arc<dyn Storage> =
            Arc::new(FileStorage::new(dir.path(), StorageConfig::default()).unwrap());

        let mut catalog = SegmentCatalog::new();
        catalog.add(crate::catalog::SegmentRecord::new("_0", 10));
        CatalogWriter::new(storage.clone()).commit(&mut catalog).unwrap();

        run(&["commit", path]).unwrap();

        let loaded = CatalogReader::new(storage).load().unwrap();
        assert_eq!(loaded.version(), 2);
        assert_eq!(loaded.records(), catalog.records());
    }

    #[test]
    fn test_read_commands_leave_missing_directory_alone() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("typo");
        let path = missing.to_str().unwrap();

        assert!(run(&["inspect", path]).unwrap_err().is_not_found());
        assert!(run(&["version", path]).unwrap_err().is_not_found());
        assert!(run(&["commit", path]).unwrap_err().is_not_found());
        assert!(!missing.exists());

        run(&["commit", path, "--init"]).unwrap();
        assert!(missing.join("segments").exists());
    }

    #[test]
    fn test_custom_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_str().unwrap();
        let config_path = dir.path().join("catalog.json");
        std::fs::write(&config_path, r#"{"segments_file": "catalog"}"#).unwrap();

        run(&["--config", config_path.to_str().unwrap(), "commit", path, "--init"]).unwrap();
        assert!(dir.path().join("catalog").exists());
        assert!(!dir.path().join("segments").exists());
    }
}
