//! Error types for segcat.
//!
//! All fallible operations in the crate return [`Result`], whose error type is
//! the [`SegcatError`] enum. The variants that matter most to callers are the
//! format errors raised while decoding a catalog and the I/O errors raised
//! while publishing one.
//!
//! # Examples
//!
//! ```
//! use segcat::error::{Result, SegcatError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SegcatError::corrupt_format("stream ended inside a record"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

use crate::storage::StorageError;

/// The main error type for segcat operations.
#[derive(Error, Debug)]
pub enum SegcatError {
    /// I/O errors (staging writes, renames, directory syncs).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The catalog declares a format revision this reader does not understand.
    #[error("Unsupported format version: {format}")]
    UnsupportedFormat {
        /// The raw marker read from the head of the stream.
        format: i32,
    },

    /// The catalog bytes are truncated or otherwise malformed.
    #[error("Corrupt format: {0}")]
    CorruptFormat(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The operation cannot proceed from the current state (exhausted counters,
    /// version overflow).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SegcatError.
pub type Result<T> = std::result::Result<T, SegcatError>;

impl SegcatError {
    /// Create a new unsupported format error.
    pub fn unsupported_format(format: i32) -> Self {
        SegcatError::UnsupportedFormat { format }
    }

    /// Create a new corrupt format error.
    pub fn corrupt_format<S: Into<String>>(msg: S) -> Self {
        SegcatError::CorruptFormat(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        SegcatError::Storage(StorageError::Other(msg.into()))
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        SegcatError::InvalidOperation(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SegcatError::Other(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SegcatError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SegcatError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error means the requested file does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            SegcatError::Storage(StorageError::FileNotFound(_)) => true,
            SegcatError::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Whether this error came from decoding catalog bytes rather than from
    /// the storage underneath them.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            SegcatError::UnsupportedFormat { .. } | SegcatError::CorruptFormat(_)
        )
    }
}
