//! codecs/stored.rs
//! Store-only engine.
//!
//! Frame layout (all integers little-endian):
//!
//! ```text
//! "ZST0" | { u32 len (>0) | payload | u32 crc32(payload) }* | u32 0 | u64 total_len
//! ```
//!
//! Input is buffered until a full block is available, so a feed step can
//! consume input without producing output, and later drain queued output
//! without consuming any. Output is independent of how input was split.

use std::collections::VecDeque;
use std::mem;

use crc32fast::Hasher;

use crate::compression::params::CompressionParams;
use crate::compression::types::{CompressionEngine, FeedProgress, FinishProgress};
use crate::constants::{STORED_BLOCK_SIZE, STORED_MAGIC};
use crate::types::{Result, StreamError};

const CODEC: &str = "stored";

/// Length prefix + crc32 suffix around each block.
pub const BLOCK_OVERHEAD: usize = 8;

/// End marker + total length.
pub const TRAILER_LEN: usize = 12;

#[derive(Debug, Clone, Copy)]
pub struct StoredEngine {
    block_size: usize,
}

impl Default for StoredEngine {
    fn default() -> Self {
        Self { block_size: STORED_BLOCK_SIZE }
    }
}

impl StoredEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block_size(block_size: usize) -> Self {
        Self { block_size: block_size.max(1) }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

/// Per-stream state of the store-only engine.
#[derive(Debug)]
pub struct StoredStream {
    block: Vec<u8>,
    pending: VecDeque<u8>,
    total: u64,
    pledged: Option<u64>,
    ended: bool,
}

impl StoredStream {
    fn seal_block(&mut self) {
        if self.block.is_empty() {
            return;
        }
        let mut hasher = Hasher::new();
        hasher.update(&self.block);

        self.pending.extend((self.block.len() as u32).to_le_bytes());
        self.pending.extend(self.block.drain(..));
        self.pending.extend(hasher.finalize().to_le_bytes());
    }

    fn drain_into(&mut self, output: &mut [u8]) -> usize {
        let n = self.pending.len().min(output.len());
        for (dst, src) in output.iter_mut().zip(self.pending.drain(..n)) {
            *dst = src;
        }
        n
    }
}

impl CompressionEngine for StoredEngine {
    type Handle = StoredStream;

    fn name(&self) -> &'static str {
        CODEC
    }

    fn open(&self, _params: &CompressionParams, source_size: Option<u64>) -> Result<Self::Handle> {
        let mut block = Vec::new();
        block.try_reserve_exact(self.block_size)
            .map_err(|_| StreamError::Allocation {
                context: "stored block buffer",
                requested: self.block_size,
            })?;

        Ok(StoredStream {
            block,
            pending: VecDeque::from(STORED_MAGIC.to_vec()),
            total: 0,
            pledged: source_size,
            ended: false,
        })
    }

    fn feed(&self, stream: &mut Self::Handle, input: &[u8], output: &mut [u8]) -> Result<FeedProgress> {
        if stream.ended {
            return Err(StreamError::CodecProcessFailed {
                codec: CODEC,
                msg: "stream already ended".into(),
            });
        }

        // Queued output goes first; input waits until the queue is empty.
        if !stream.pending.is_empty() {
            let produced = stream.drain_into(output);
            return Ok(FeedProgress { consumed: 0, produced });
        }

        let take = input.len().min(self.block_size - stream.block.len());
        if let Some(pledged) = stream.pledged {
            if stream.total + take as u64 > pledged {
                return Err(StreamError::CodecProcessFailed {
                    codec: CODEC,
                    msg: format!("input exceeds pledged source size {pledged}"),
                });
            }
        }

        stream.block.extend_from_slice(&input[..take]);
        stream.total += take as u64;
        if stream.block.len() == self.block_size {
            stream.seal_block();
        }

        let produced = stream.drain_into(output);
        Ok(FeedProgress { consumed: take, produced })
    }

    fn finish(&self, stream: &mut Self::Handle, output: &mut [u8]) -> Result<FinishProgress> {
        if !stream.ended {
            if let Some(pledged) = stream.pledged {
                if pledged != stream.total {
                    return Err(StreamError::CodecFinishFailed {
                        codec: CODEC,
                        msg: format!(
                            "source size mismatch: pledged {pledged}, received {}",
                            stream.total
                        ),
                    });
                }
            }
            stream.seal_block();
            stream.pending.extend(0u32.to_le_bytes());
            stream.pending.extend(stream.total.to_le_bytes());
            stream.ended = true;
        }

        let produced = stream.drain_into(output);
        Ok(FinishProgress { produced, pending: stream.pending.len() })
    }

    fn close(&self, stream: Self::Handle) {
        drop(stream);
    }

    fn memory_footprint(&self, stream: &Self::Handle) -> usize {
        mem::size_of::<StoredStream>() + stream.block.capacity() + stream.pending.capacity()
    }

    fn recommended_output_size(&self) -> usize {
        self.block_size + BLOCK_OVERHEAD
    }
}
