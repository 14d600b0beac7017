//! Log storage
//!
//! The byte-sequence handle the store appends to and reads from.
//!
//! ## Responsibilities
//! - Append bytes at the end of the log, nothing else
//! - Hand out a full read-only copy of the current contents
//!
//! The store never decides where the bytes live: a file, a test buffer, or
//! anything else implementing `LogStorage` can back it.

mod file;
mod memory;

use bytes::Bytes;

use crate::error::Result;

pub use file::FileLog;
pub use memory::MemoryLog;

/// Append-only byte storage consumed by the store
pub trait LogStorage: Send + Sync {
    /// Append `bytes` at the end of the log as one write
    fn append_bytes(&self, bytes: &[u8]) -> Result<()>;

    /// Read the entire current contents
    fn read_all(&self) -> Result<Bytes>;
}

impl<S: LogStorage + ?Sized> LogStorage for Box<S> {
    fn append_bytes(&self, bytes: &[u8]) -> Result<()> {
        (**self).append_bytes(bytes)
    }

    fn read_all(&self) -> Result<Bytes> {
        (**self).read_all()
    }
}
