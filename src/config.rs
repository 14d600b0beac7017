//! Configuration for postlog
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a file-backed log
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the append-only log file.
    /// Parent directories are created on open.
    pub log_path: PathBuf,

    /// Sync strategy: whether to fsync after each append
    pub sync_strategy: SyncStrategy,
}

/// Log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync after every append (safest, slowest)
    EveryAppend,

    /// Leave flushing to the OS page cache
    OsBuffered,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("./posts/posts.txt"),
            sync_strategy: SyncStrategy::OsBuffered,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the log file path
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_path = path.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
