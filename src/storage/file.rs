//! File-backed log storage

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::config::SyncStrategy;
use crate::error::Result;
use super::LogStorage;

/// Log stored in a single flat file
///
/// Every append opens the file in append mode, writes, and closes it again.
/// No handle is kept between calls.
#[derive(Debug, Clone)]
pub struct FileLog {
    path: PathBuf,
    sync_strategy: SyncStrategy,
}

impl FileLog {
    /// Open or create a log file
    ///
    /// Creates missing parent directories and an empty file, so a fresh log
    /// reads back as empty instead of failing.
    pub fn open(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            sync_strategy,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sync_strategy(&self) -> SyncStrategy {
        self.sync_strategy
    }
}

impl LogStorage for FileLog {
    fn append_bytes(&self, bytes: &[u8]) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(bytes)?;

        if self.sync_strategy == SyncStrategy::EveryAppend {
            file.sync_data()?;
        }
        Ok(())
    }

    fn read_all(&self) -> Result<Bytes> {
        Ok(Bytes::from(fs::read(&self.path)?))
    }
}
