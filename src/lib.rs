//! # postlog
//!
//! An append-only comment store for a small forum:
//! - Flat string-to-string records, one escaped object per line
//! - Lenient streaming scanner that skips garbage and torn writes
//! - Linear scan-and-filter reads in append order
//! - Pluggable storage (file or in-memory)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Caller (HTTP handler, CLI, ...)                 │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │ append(record)               │ scan(predicate)
//! ┌──────────────▼──────────────────────────────▼───────────────┐
//! │                        AppendLog                             │
//! │           (serialized appends / lock-free scans)             │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//!                ▼                              ▼
//!         ┌─────────────┐                ┌─────────────┐
//!         │    Codec    │                │ LogStorage  │
//!         │ encode/scan │                │ file / mem  │
//!         └─────────────┘                └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod codec;
pub mod storage;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PostlogError, Result};
pub use config::{Config, SyncStrategy};
pub use record::{Record, RecordSpan};
pub use store::{AppendLog, LogStats, ScanResult};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of postlog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
