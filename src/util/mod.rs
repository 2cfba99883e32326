//! Utility modules for segcat.

pub mod clock;

// Re-export commonly used types
pub use clock::*;
