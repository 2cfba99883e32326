//! On-disk layout of the segments catalog.
//!
//! ```text
//! int32      marker                 <0: versioned; >=0: legacy generation counter
//! [int64     version]               present iff marker < 0
//! [int32     counter]               present iff marker < 0
//! int32      record count
//! repeated {
//!   int32    name length
//!   bytes    name (UTF-8)
//!   int32    document count
//! }
//! [int64     version]               present iff marker >= 0 and bytes remain
//! ```
//!
//! All integers are big-endian. The legacy encoding has no header at all: its
//! first field is the generation counter, which is never negative, so any
//! negative first word identifies the versioned encoding and carries its
//! format revision.

use crate::error::{Result, SegcatError};
use crate::storage::{StorageInput, StructReader};

/// The format revision this crate writes, and the oldest (most negative) it reads.
pub const FORMAT: i32 = -1;

/// Default canonical name of the catalog.
pub const SEGMENTS_FILE: &str = "segments";

/// Default name the next generation is staged under.
pub const STAGING_FILE: &str = "segments.new";

/// The fixed-size part that precedes the record list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogHeader {
    /// Header-less encoding; the version, if any, trails the record list.
    Legacy {
        /// Generation counter, taken from the marker.
        counter: i32,
    },
    /// Encoding with an explicit format revision, version and counter.
    Versioned {
        /// The raw marker.
        format: i32,
        /// Commit version.
        version: i64,
        /// Generation counter.
        counter: i32,
    },
}

impl CatalogHeader {
    /// Read the header from the start of a catalog stream.
    ///
    /// Fails with [`SegcatError::UnsupportedFormat`] when the marker is below
    /// [`FORMAT`]; the rest of such a file is never interpreted.
    pub fn read<R: StorageInput>(reader: &mut StructReader<R>) -> Result<Self> {
        let marker = reader.read_i32()?;
        if marker >= 0 {
            return Ok(CatalogHeader::Legacy { counter: marker });
        }

        if marker < FORMAT {
            return Err(SegcatError::unsupported_format(marker));
        }

        let version = reader.read_i64()?;
        let counter = reader.read_i32()?;

        Ok(CatalogHeader::Versioned {
            format: marker,
            version,
            counter,
        })
    }

    /// Generation counter recorded in the header.
    pub fn counter(&self) -> i32 {
        match *self {
            CatalogHeader::Legacy { counter } | CatalogHeader::Versioned { counter, .. } => counter,
        }
    }

    /// Version recorded in the header; legacy headers carry none.
    pub fn version(&self) -> Option<i64> {
        match *self {
            CatalogHeader::Legacy { .. } => None,
            CatalogHeader::Versioned { version, .. } => Some(version),
        }
    }

    /// Whether this is the header-less legacy encoding.
    pub fn is_legacy(&self) -> bool {
        matches!(self, CatalogHeader::Legacy { .. })
    }

    /// Short name of the encoding, for logs and tooling.
    pub fn encoding(&self) -> &'static str {
        match self {
            CatalogHeader::Legacy { .. } => "legacy",
            CatalogHeader::Versioned { .. } => "versioned",
        }
    }
}
