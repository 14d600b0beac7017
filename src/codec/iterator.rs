//! Iterator over every record in a buffer

use std::iter::FusedIterator;

use crate::record::Record;
use super::decode_record;

/// Iterator over the records of an in-memory log image
///
/// Each yielded record carries the span reported by the decode call that
/// produced it, i.e. relative to where the previous record ended.
pub struct RecordIter<'a> {
    buf: &'a [u8],
    position: usize,
}

impl<'a> RecordIter<'a> {
    /// Iterate from the start of `buf`
    pub fn new(buf: &'a [u8]) -> Self {
        Self::starting_at(buf, 0)
    }

    /// Iterate from an arbitrary byte position
    pub fn starting_at(buf: &'a [u8], position: usize) -> Self {
        Self { buf, position }
    }

    /// Absolute position the next decode call will start from
    pub fn position(&self) -> usize {
        self.position
    }
}

impl Iterator for RecordIter<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.buf.len() {
            return None;
        }

        let record = decode_record(self.buf, self.position);
        match record.as_ref().and_then(Record::span) {
            Some(span) => self.position += span.advance(),
            None => self.position = self.buf.len(),
        }
        record
    }
}

impl FusedIterator for RecordIter<'_> {}
