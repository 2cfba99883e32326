//! The segments catalog: which segments make up the current generation of an
//! index, and how that list is persisted.
//!
//! - [`SegmentCatalog`] is the in-memory list, with its naming counter and
//!   commit version.
//! - [`CatalogReader`] loads a catalog in either on-disk encoding and can probe
//!   just its version.
//! - [`CatalogWriter`] publishes a new generation with a staged write and an
//!   atomic rename.

pub mod config;
pub mod format;
pub mod probe;
pub mod reader;
pub mod record;
pub mod segment_catalog;
pub mod writer;

// Re-export commonly used types
pub use config::CatalogConfig;
pub use format::{CatalogHeader, FORMAT, SEGMENTS_FILE, STAGING_FILE};
pub use reader::CatalogReader;
pub use record::{SegmentRecord, segment_name_for};
pub use segment_catalog::SegmentCatalog;
pub use writer::CatalogWriter;
