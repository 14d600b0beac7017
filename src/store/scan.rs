//! Scan results and log statistics

use crate::record::Record;

/// Outcome of a filtered scan
///
/// Keeps the number of records scanned alongside the matches so callers can
/// tell an empty log apart from a filter that matched nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    records: Vec<Record>,
    scanned: usize,
}

impl ScanResult {
    pub(crate) fn new(records: Vec<Record>, scanned: usize) -> Self {
        Self { records, scanned }
    }

    /// Matching records, in encounter order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Number of matching records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of valid records decoded, matching or not
    pub fn scanned(&self) -> usize {
        self.scanned
    }

    /// The log held no valid records at all
    pub fn is_empty_log(&self) -> bool {
        self.scanned == 0
    }

    /// The log held records but none passed the filter
    pub fn is_no_match(&self) -> bool {
        self.scanned > 0 && self.records.is_empty()
    }
}

impl IntoIterator for ScanResult {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Statistics gathered by a read-only pass over the log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogStats {
    /// Number of valid records
    pub records: usize,

    /// Total size of the log in bytes
    pub total_bytes: usize,

    /// Bytes covered by valid records, braces included
    pub record_bytes: usize,

    /// Non-whitespace bytes outside any valid record
    /// (torn writes, stray text, invalid objects)
    pub garbage_bytes: usize,
}

impl LogStats {
    /// Whether anything besides records and separators was found
    pub fn is_clean(&self) -> bool {
        self.garbage_bytes == 0
    }
}
