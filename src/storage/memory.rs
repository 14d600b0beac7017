//! In-memory log storage

use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;

use crate::error::Result;
use super::LogStorage;

/// Log held in a growable in-memory buffer
#[derive(Debug, Default)]
pub struct MemoryLog {
    buf: Mutex<BytesMut>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the log with pre-existing contents
    pub fn from_bytes(initial: impl AsRef<[u8]>) -> Self {
        Self {
            buf: Mutex::new(BytesMut::from(initial.as_ref())),
        }
    }

    /// Current size in bytes
    pub fn len(&self) -> usize {
        self.buf.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogStorage for MemoryLog {
    fn append_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.buf.lock().extend_from_slice(bytes);
        Ok(())
    }

    fn read_all(&self) -> Result<Bytes> {
        Ok(Bytes::copy_from_slice(&self.buf.lock()))
    }
}
