//! Storage abstraction layer for segcat.
//!
//! The catalog reads and writes through the [`Storage`] trait, so the same
//! commit protocol runs against a directory on disk or an in-memory map.

pub mod file;
pub mod memory;
pub mod structured;
pub mod traits;

// Re-export commonly used types
pub use file::*;
pub use memory::*;
pub use structured::*;
pub use traits::*;
