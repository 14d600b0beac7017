//! Append Log Store
//!
//! Append-only record storage with linear scan-and-filter reads.
//!
//! ## Responsibilities
//! - Encode and append one record per call, newline-terminated
//! - Serialize concurrent appends so writes never interleave
//! - Scan the whole log in encounter order, filtering by predicate
//! - Report how much of the log is unreadable (without repairing it)
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────┐
//! │ {"msg":"hello","user":"alice"}\n     │
//! │ {"msg":"line one\nline two",...}\n   │  <- raw newline inside a value
//! │ {"msg":"trunc                        │  <- torn tail, skipped by scans
//! └──────────────────────────────────────┘
//! ```
//! Record boundaries are found structurally by the scanner, never by
//! splitting on newlines.

mod append_log;
mod scan;

pub use append_log::{field_equals, AppendLog};
pub use scan::{LogStats, ScanResult};
