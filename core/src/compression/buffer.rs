//! compression/buffer.rs
//! Scratch and result buffers for the drive loop.
//!
//! Summary:
//! - `ScratchBuffer` is fixed-capacity write scratch reused by every engine
//!   call; it is never handed to callers.
//! - `ResultAccumulator` collects produced chunks for the pull-style adapter
//!   and grows by exactly the appended amount.

use bytes::Bytes;

use crate::types::{Result, StreamError};

/// Fixed-capacity output scratch with a write cursor.
#[derive(Debug)]
pub struct ScratchBuffer {
    data: Vec<u8>,
    write_pos: usize,
}

impl ScratchBuffer {
    /// Allocate a scratch buffer of exactly `capacity` bytes.
    ///
    /// # Errors
    /// - `Allocation` if the memory could not be reserved.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| StreamError::Allocation {
                context: "scratch buffer",
                requested: capacity,
            })?;
        data.resize(capacity, 0);
        Ok(Self { data, write_pos: 0 })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Region the engine may write into.
    #[inline]
    pub fn writable(&mut self) -> &mut [u8] {
        &mut self.data[self.write_pos..]
    }

    /// Mark `n` more bytes as written (clamped to capacity).
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.write_pos = (self.write_pos + n).min(self.data.len());
    }

    /// Bytes written since the last `clear`.
    #[inline]
    pub fn readable(&self) -> &[u8] {
        &self.data[..self.write_pos]
    }

    /// Reset the write cursor to zero.
    #[inline]
    pub fn clear(&mut self) {
        self.write_pos = 0;
    }
}

/// Growable accumulator for one `compress`/`flush` call.
///
/// Starts unallocated. `take` hands out the contents as an immutable
/// `Bytes` and leaves the accumulator empty again.
#[derive(Debug, Default)]
pub struct ResultAccumulator {
    data: Vec<u8>,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk, growing storage by exactly `chunk.len()`.
    ///
    /// # Errors
    /// - `Allocation` if growth fails; the accumulator is left untouched.
    pub fn append(&mut self, chunk: &[u8]) -> Result<()> {
        self.data
            .try_reserve_exact(chunk.len())
            .map_err(|_| StreamError::Allocation {
                context: "result accumulator",
                requested: self.data.len().saturating_add(chunk.len()),
            })?;
        self.data.extend_from_slice(chunk);
        Ok(())
    }

    /// Snapshot the accumulated bytes and reset. Returns an empty `Bytes`
    /// when nothing was produced.
    pub fn take(&mut self) -> Bytes {
        if self.data.is_empty() {
            return Bytes::new();
        }
        Bytes::from(std::mem::take(&mut self.data))
    }

    /// Drop an in-progress accumulation (the call that built it failed).
    pub fn discard(&mut self) {
        self.data = Vec::new();
    }
}
