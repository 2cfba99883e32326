//! The in-memory segment catalog.

use std::slice;

use crate::catalog::record::{SegmentRecord, segment_name_for};
use crate::error::{Result, SegcatError};
use crate::util::Clock;

/// The ordered list of segments making up one generation of an index, plus the
/// counter used to name new segments and the logical commit version.
///
/// The record list is private: callers append, insert and remove through the
/// methods below, which keep the order stable. Committing goes through
/// [`CatalogWriter`](crate::catalog::CatalogWriter), which is the only place the
/// version advances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentCatalog {
    counter: i32,
    version: i64,
    records: Vec<SegmentRecord>,
}

impl SegmentCatalog {
    /// Create an empty catalog at version 0.
    pub fn new() -> Self {
        SegmentCatalog::default()
    }

    /// Create an empty catalog whose version starts at the clock's current
    /// time, so versions stay unique across indexes created at different times.
    pub fn with_clock(clock: &dyn Clock) -> Self {
        SegmentCatalog {
            version: clock.now_millis(),
            ..SegmentCatalog::default()
        }
    }

    pub(crate) fn from_parts(counter: i32, version: i64, records: Vec<SegmentRecord>) -> Self {
        SegmentCatalog {
            counter,
            version,
            records,
        }
    }

    /// The version of the generation this catalog was loaded from or last
    /// committed as.
    pub fn version(&self) -> i64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    /// The generation counter used to mint segment names.
    pub fn counter(&self) -> i32 {
        self.counter
    }

    /// Raise the counter to at least `counter`. The counter never decreases.
    pub fn advance_counter(&mut self, counter: i32) {
        self.counter = self.counter.max(counter);
    }

    /// Mint the next segment name (`_0`, `_1`, ... `_a`, ...) and bump the counter.
    pub fn next_segment_name(&mut self) -> Result<String> {
        let name = segment_name_for(self.counter);
        self.counter = self
            .counter
            .checked_add(1)
            .ok_or_else(|| SegcatError::invalid_operation("segment counter exhausted"))?;
        Ok(name)
    }

    /// The record at position `index`.
    pub fn info(&self, index: usize) -> Option<&SegmentRecord> {
        self.records.get(index)
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog lists no segments.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the records in order.
    pub fn iter(&self) -> slice::Iter<'_, SegmentRecord> {
        self.records.iter()
    }

    /// All records, in order.
    pub fn records(&self) -> &[SegmentRecord] {
        &self.records
    }

    /// Append a record at the end.
    pub fn add(&mut self, record: SegmentRecord) {
        self.records.push(record);
    }

    /// Insert a record at `index`, shifting later records back.
    pub fn insert(&mut self, index: usize, record: SegmentRecord) -> Result<()> {
        if index > self.records.len() {
            return Err(SegcatError::invalid_argument(format!(
                "insert position {index} beyond {} segments",
                self.records.len()
            )));
        }
        self.records.insert(index, record);
        Ok(())
    }

    /// Remove and return the record at `index`, keeping the others in order.
    pub fn remove(&mut self, index: usize) -> Option<SegmentRecord> {
        if index < self.records.len() {
            Some(self.records.remove(index))
        } else {
            None
        }
    }

    /// Remove and return the first record named `name`.
    pub fn remove_named(&mut self, name: &str) -> Option<SegmentRecord> {
        let index = self.position(name)?;
        Some(self.records.remove(index))
    }

    /// Drop every record. The counter and version are kept.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Position of the first record named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name() == name)
    }

    /// Whether a record named `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Sum of document counts over all segments.
    pub fn total_documents(&self) -> i64 {
        self.records.iter().map(|r| i64::from(r.doc_count())).sum()
    }
}

impl<'a> IntoIterator for &'a SegmentCatalog {
    type Item = &'a SegmentRecord;
    type IntoIter = slice::Iter<'a, SegmentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
