//! A single segment entry in the catalog.

use serde::{Deserialize, Serialize};

/// The catalog's view of one segment: its name and how many documents it holds.
///
/// This is bookkeeping only; the segment's files are never opened through it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentRecord {
    name: String,
    doc_count: i32,
}

impl SegmentRecord {
    /// Create a new segment record.
    pub fn new<S: Into<String>>(name: S, doc_count: i32) -> Self {
        SegmentRecord {
            name: name.into(),
            doc_count,
        }
    }

    /// Segment name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of documents recorded for the segment.
    pub fn doc_count(&self) -> i32 {
        self.doc_count
    }
}

/// Format a generation counter the way segment names spell it: lowercase base 36.
pub fn segment_name_for(counter: i32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut value = i64::from(counter).unsigned_abs();
    let mut digits = Vec::new();
    loop {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    if counter < 0 {
        digits.push(b'-');
    }
    digits.push(b'_');
    digits.reverse();

    // Every byte pushed above is ASCII.
    digits.into_iter().map(char::from).collect()
}
