//! Append log implementation

use parking_lot::Mutex;

use crate::codec::{decode_record, encode_record, RecordIter};
use crate::config::Config;
use crate::error::Result;
use crate::record::Record;
use crate::storage::{FileLog, LogStorage};
use super::{LogStats, ScanResult};

/// Line terminator written after every record
const RECORD_SEPARATOR: u8 = b'\n';

/// Append-only record store over a `LogStorage`
///
/// ## Concurrency
/// - Appends are serialized by `append_lock`, so two records never
///   interleave in the log
/// - Scans take no lock; a scan racing an append may see a torn tail,
///   which the decoder skips
pub struct AppendLog<S = FileLog> {
    storage: S,

    /// Held across the write of each record
    append_lock: Mutex<()>,
}

impl AppendLog<FileLog> {
    /// Open or create a file-backed log from config
    pub fn open(config: &Config) -> Result<Self> {
        let storage = FileLog::open(&config.log_path, config.sync_strategy)?;
        tracing::debug!(path = %config.log_path.display(), "opened log");
        Ok(Self::with_storage(storage))
    }
}

impl<S: LogStorage> AppendLog<S> {
    /// Build a store over an existing storage handle
    pub fn with_storage(storage: S) -> Self {
        Self {
            storage,
            append_lock: Mutex::new(()),
        }
    }

    /// Encode a record and append it, newline-terminated
    ///
    /// Nothing is written if the record has an invalid field name.
    pub fn append(&self, record: &Record) -> Result<()> {
        self.append_line(record).map(|_| ())
    }

    /// Same as `append`, returning the exact bytes written (including the
    /// trailing newline)
    pub fn append_line(&self, record: &Record) -> Result<Vec<u8>> {
        let mut line = encode_record(record)?;
        line.push(RECORD_SEPARATOR);

        {
            let _guard = self.append_lock.lock();
            self.storage.append_bytes(&line)?;
        }

        tracing::debug!(fields = record.len(), bytes = line.len(), "appended record");
        Ok(line)
    }

    /// Scan the whole log, keeping records that pass `predicate`
    ///
    /// With no predicate every record is kept. Records come back in the
    /// order they appear in the log.
    pub fn scan(&self, predicate: Option<&dyn Fn(&Record) -> bool>) -> Result<ScanResult> {
        let buf = self.storage.read_all()?;

        let mut scanned = 0;
        let records: Vec<Record> = RecordIter::new(&buf)
            .inspect(|_| scanned += 1)
            .filter(|record| predicate.map_or(true, |p| p(record)))
            .collect();

        tracing::debug!(
            scanned,
            matched = records.len(),
            bytes = buf.len(),
            "scan complete"
        );
        Ok(ScanResult::new(records, scanned))
    }

    /// Every record in the log
    pub fn scan_all(&self) -> Result<Vec<Record>> {
        Ok(self.scan(None)?.into_records())
    }

    /// Records whose `field` is exactly `value`
    pub fn scan_field_eq(&self, field: &str, value: &str) -> Result<ScanResult> {
        let predicate = field_equals(field, value);
        self.scan(Some(&predicate))
    }

    /// Walk the log without collecting records and report what it holds
    pub fn stats(&self) -> Result<LogStats> {
        let buf = self.storage.read_all()?;
        let mut stats = LogStats {
            total_bytes: buf.len(),
            ..LogStats::default()
        };

        let mut cursor = 0;
        while let Some(span) = decode_record(&buf, cursor).and_then(|r| r.span()) {
            stats.garbage_bytes += count_garbage(&buf[cursor..cursor + span.offset]);
            stats.record_bytes += span.length;
            stats.records += 1;
            cursor += span.advance();
        }
        stats.garbage_bytes += count_garbage(&buf[cursor..]);

        if !stats.is_clean() {
            tracing::warn!(
                garbage_bytes = stats.garbage_bytes,
                records = stats.records,
                "log contains bytes outside any valid record"
            );
        }
        Ok(stats)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

/// Predicate matching records whose `field` equals `value`
///
/// Records without the field never match.
pub fn field_equals<'a>(field: &'a str, value: &'a str) -> impl Fn(&Record) -> bool + 'a {
    move |record| record.get(field) == Some(value)
}

fn count_garbage(bytes: &[u8]) -> usize {
    bytes.iter().filter(|b| !b.is_ascii_whitespace()).count()
}
