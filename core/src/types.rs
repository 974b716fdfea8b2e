use std::io;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, StreamError>;

/// Misuse of an adapter's lifecycle.
///
/// Always detected before the engine is touched, so the adapter state is
/// unchanged when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("cannot enter a compression scope multiple times")]
    AlreadyEntered,

    #[error("write must be called from an active compression scope")]
    NotEntered,

    #[error("cannot use an inactive compressor; no compression stream is open")]
    Inactive,

    #[error("flush() already called")]
    AlreadyFlushed,

    #[error("cannot call compress() after flush() has been called")]
    CompressAfterFlush,
}

/// Unified adapter error covering lifecycle misuse, engine failures,
/// allocation failures, and downstream I/O.
/// - Engine failures keep the codec name and the engine's own diagnostic.
/// - Messages aim to be stable for logs and telemetry.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Lifecycle misuse (re-entry, write outside scope, double flush...).
    #[error("usage error: {0}")]
    Usage(#[from] UsageError),

    /// Engine handle could not be opened (bad parameters, engine refusal).
    #[error("codec {codec} init failed: {msg}")]
    CodecInitFailed { codec: &'static str, msg: String },

    /// Engine feed step reported a failure.
    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: &'static str, msg: String },

    /// Engine finish step reported a failure.
    #[error("codec {codec} finish failed: {msg}")]
    CodecFinishFailed { codec: &'static str, msg: String },

    /// Scratch buffer, accumulator, or engine context allocation failed.
    #[error("allocation failed: {context} ({requested} bytes requested)")]
    Allocation { context: &'static str, requested: usize },

    /// The downstream writer rejected a chunk.
    #[error("sink write failed: {0}")]
    Sink(#[source] io::Error),

    /// Stalled engine or an engine breaking its progress contract.
    #[error("internal invariant violated: {0}")]
    Invariant(String),

    /// Invalid adapter configuration.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl StreamError {
    pub fn is_usage(&self) -> bool {
        matches!(self, StreamError::Usage(_))
    }

    /// True for failures reported by the compression engine itself.
    pub fn is_engine(&self) -> bool {
        matches!(
            self,
            StreamError::CodecInitFailed { .. }
                | StreamError::CodecProcessFailed { .. }
                | StreamError::CodecFinishFailed { .. }
        )
    }

    pub fn is_allocation(&self) -> bool {
        matches!(self, StreamError::Allocation { .. })
    }

    /// Stable category name for logs and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            StreamError::Usage(_) => "usage",
            StreamError::CodecInitFailed { .. } => "codec_init",
            StreamError::CodecProcessFailed { .. } => "codec_process",
            StreamError::CodecFinishFailed { .. } => "codec_finish",
            StreamError::Allocation { .. } => "allocation",
            StreamError::Sink(_) => "sink_io",
            StreamError::Invariant(_) => "invariant",
            StreamError::Validation(_) => "validation",
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Sink(inner) => inner,
            StreamError::Usage(_) | StreamError::Validation(_) => {
                io::Error::new(io::ErrorKind::InvalidInput, e)
            }
            StreamError::Allocation { .. } => io::Error::new(io::ErrorKind::OutOfMemory, e),
            other => io::Error::other(other),
        }
    }
}
