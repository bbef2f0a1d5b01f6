use std::fmt::{self, Debug, Formatter};

use zeroize::Zeroize;

use crate::shred::ZeroBufferError;

/// The heap-owned working buffer carrying entropy on its way to a target.
///
/// Whatever part of the buffer has been handed out by [`chunk`](ShredBuffer::chunk) is considered
/// dirty until [`scrub`](ShredBuffer::scrub) zeroes it. The whole allocation is zeroed again on
/// drop, so the buffer's contents can't outlive it on any exit path, unwinding included.
pub struct ShredBuffer {
    bytes: Vec<u8>,
    dirty: usize,
}

impl ShredBuffer {
    pub fn new(len: usize) -> Result<ShredBuffer, ZeroBufferError> {
        if len == 0 {
            Err(ZeroBufferError)?
        }
        Ok(ShredBuffer {
            bytes: vec![0; len],
            dirty: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the first `len` bytes of the buffer for filling, capped at the buffer's length.
    pub fn chunk(&mut self, len: usize) -> &mut [u8] {
        let len = len.min(self.bytes.len());
        self.dirty = self.dirty.max(len);
        &mut self.bytes[..len]
    }

    /// Zeroes every byte handed out since the last scrub.
    pub fn scrub(&mut self) {
        self.bytes[..self.dirty].zeroize();
        self.dirty = 0;
    }

    pub fn is_scrubbed(&self) -> bool {
        self.dirty == 0 && self.bytes.iter().all(|b| *b == 0)
    }
}

impl Drop for ShredBuffer {
    fn drop(&mut self) {
        // Zeroes the full capacity, not just the dirty prefix.
        self.bytes.zeroize();
    }
}

impl Debug for ShredBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShredBuffer")
            .field("len", &self.bytes.len())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
