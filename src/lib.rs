//! # segcat
//!
//! Persistence and versioning for a search index's segment catalog: the list
//! of immutable segments that make up a committed index snapshot, the counter
//! used to name new segments, and the commit version.
//!
//! ## Features
//!
//! - Reads both the versioned encoding and the older header-less one
//! - Refuses catalogs written by a newer format revision
//! - Cheap version probe that stops after the header when it can
//! - Crash-safe commits through a staged write and an atomic rename
//! - Pluggable storage backends (file system, memory)
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use segcat::catalog::{CatalogReader, CatalogWriter, SegmentCatalog, SegmentRecord};
//! use segcat::storage::MemoryStorage;
//!
//! # fn main() -> segcat::error::Result<()> {
//! let storage = Arc::new(MemoryStorage::new_default());
//!
//! let mut catalog = SegmentCatalog::new();
//! let name = catalog.next_segment_name()?;
//! catalog.add(SegmentRecord::new(name, 100));
//!
//! CatalogWriter::new(storage.clone()).commit(&mut catalog)?;
//! assert_eq!(catalog.version(), 1);
//!
//! let reader = CatalogReader::new(storage);
//! assert_eq!(reader.peek_version()?, 1);
//! assert_eq!(reader.load()?, catalog);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod cli;
pub mod error;
pub mod storage;
pub mod util;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
