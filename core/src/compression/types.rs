//! compression/types.rs
//! The engine contract both adapters are built on.

use crate::compression::params::CompressionParams;
use crate::types::Result;

/// Outcome of one feed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedProgress {
    /// Input bytes the engine took from the front of `input`.
    pub consumed: usize,
    /// Output bytes written at the front of `output`.
    pub produced: usize,
}

/// Outcome of one finish step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FinishProgress {
    /// Output bytes written at the front of `output`.
    pub produced: usize,
    /// Epilogue bytes still held by the engine; `0` ends the stream.
    pub pending: usize,
}

impl FinishProgress {
    #[inline]
    pub fn is_done(&self) -> bool {
        self.pending == 0
    }
}

/// An incremental, block-oriented compression engine.
///
/// The engine itself is stateless configuration; all stream state lives in
/// `Handle`, which is exclusively owned by one adapter at a time. `close`
/// consumes the handle, so a handle is released at most once.
pub trait CompressionEngine {
    type Handle;

    /// Short codec name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Open a new stream.
    ///
    /// # Errors
    /// - `CodecInitFailed` if the engine rejects the parameters.
    /// - `Allocation` if the engine context could not be allocated.
    fn open(&self, params: &CompressionParams, source_size: Option<u64>) -> Result<Self::Handle>;

    /// Feed input and collect whatever output is ready.
    ///
    /// The engine may consume no input while still producing output (it is
    /// draining internal buffers), or consume input without producing any.
    fn feed(&self, handle: &mut Self::Handle, input: &[u8], output: &mut [u8]) -> Result<FeedProgress>;

    /// Emit epilogue bytes. Called repeatedly until `pending == 0`.
    fn finish(&self, handle: &mut Self::Handle, output: &mut [u8]) -> Result<FinishProgress>;

    /// Release the handle.
    fn close(&self, handle: Self::Handle);

    /// Bytes of memory held by an open handle.
    fn memory_footprint(&self, handle: &Self::Handle) -> usize;

    /// Recommended scratch buffer capacity for this engine.
    fn recommended_output_size(&self) -> usize;
}
