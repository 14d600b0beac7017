//! Record definitions
//!
//! A record is one flat string-to-string mapping, persisted as a single
//! encoded object in the log.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PostlogError, Result};

/// Field names starting with this prefix are reserved for scan metadata
/// (`_offset`, `_length`) and are rejected by the encoder.
pub const RESERVED_PREFIX: char = '_';

/// Where a decoded record sat relative to the decode call's start index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSpan {
    /// Bytes from the start index to the record's opening `{`
    pub offset: usize,

    /// Bytes from the opening `{` to the matching `}`, inclusive
    pub length: usize,
}

impl RecordSpan {
    /// How far the caller must advance its start index to resume scanning
    /// right after this record.
    pub fn advance(&self) -> usize {
        self.offset + self.length
    }
}

/// A flat mapping of field names to string values
///
/// Fields are kept sorted by name, which is also the order the encoder
/// writes them in. Equality compares fields only; the span attached by the
/// decoder is positional and does not take part.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,

    #[serde(skip)]
    span: Option<RecordSpan>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a field, returning the previous value if any
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }

    // =========================================================================
    // Scan metadata
    // =========================================================================

    /// Span reported by the decoder, `None` for records built by hand
    pub fn span(&self) -> Option<RecordSpan> {
        self.span
    }

    /// `_offset`: bytes from the decode start index to this record's `{`
    pub fn offset(&self) -> Option<usize> {
        self.span.map(|s| s.offset)
    }

    /// `_length`: bytes from this record's `{` to its `}`, inclusive
    pub fn length(&self) -> Option<usize> {
        self.span.map(|s| s.length)
    }

    pub(crate) fn set_span(&mut self, span: RecordSpan) {
        self.span = Some(span);
    }

    /// Check every field name against the encoder's rules
    pub fn validate(&self) -> Result<()> {
        self.fields.keys().try_for_each(|name| validate_field_name(name))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Record {}

impl From<BTreeMap<String, String>> for Record {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self { fields, span: None }
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { fields, span: None }
    }
}

/// Reject empty names and names using the reserved prefix
pub fn validate_field_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with(RESERVED_PREFIX) {
        return Err(PostlogError::InvalidFieldName(name.to_string()));
    }
    Ok(())
}
