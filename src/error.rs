//! Error types for postlog
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using PostlogError
pub type Result<T> = std::result::Result<T, PostlogError>;

/// Unified error type for postlog operations
///
/// Malformed bytes inside the log are never reported here: the scanner
/// skips them and the store reports fewer records instead.
#[derive(Debug, Error)]
pub enum PostlogError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    /// A field name was empty or used the reserved `_` prefix
    #[error("Invalid field name: {0:?}")]
    InvalidFieldName(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
