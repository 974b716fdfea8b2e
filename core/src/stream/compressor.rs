//! stream/compressor.rs
//! Pull-style adapter: each call returns whatever compressed output was
//! produced, as an immutable `Bytes`.
//!
//! The handle is opened at construction. `flush` finalizes the stream and
//! makes the compressor terminal; `flushed` and "handle open" are tracked
//! separately because a failed flush still counts as flushed.

use bytes::Bytes;

use crate::compression::{CompressionEngine, EngineSession, ResultAccumulator};
use crate::config::StreamConfig;
use crate::telemetry::{TelemetryCounters, TelemetrySnapshot};
use crate::types::{Result, UsageError};

pub struct IncrementalCompressor<E: CompressionEngine> {
    session: EngineSession<E>,
    accumulator: ResultAccumulator,
    flushed: bool,
}

impl<E: CompressionEngine> IncrementalCompressor<E> {
    /// Open an engine handle and return a compressor ready for `compress`.
    ///
    /// # Errors
    /// - Validation, engine open, or allocation errors.
    pub fn new(engine: E, config: &StreamConfig) -> Result<Self> {
        let mut session = EngineSession::new(engine);
        session.open(config)?;
        Ok(Self {
            session,
            accumulator: ResultAccumulator::new(),
            flushed: false,
        })
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// Feed `data` and return the output it produced (possibly empty).
    ///
    /// # Errors
    /// - `Usage(CompressAfterFlush)` once `flush` has been called; the
    ///   engine is not touched.
    /// - Engine feed or allocation errors; output produced during this call
    ///   is discarded.
    pub fn compress(&mut self, data: &[u8]) -> Result<Bytes> {
        if self.flushed {
            return Err(UsageError::CompressAfterFlush.into());
        }

        match self.session.feed_all(data, &mut self.accumulator) {
            Ok(_) => Ok(self.accumulator.take()),
            Err(e) => {
                self.accumulator.discard();
                Err(e)
            }
        }
    }

    /// Finalize the stream and return the epilogue.
    ///
    /// The compressor is flushed from this point on, even if finalizing
    /// fails, and the engine handle is closed either way.
    ///
    /// # Errors
    /// - `Usage(AlreadyFlushed)` on a second call.
    /// - Engine finish or allocation errors.
    pub fn flush(&mut self) -> Result<Bytes> {
        if self.flushed {
            return Err(UsageError::AlreadyFlushed.into());
        }
        self.flushed = true;

        match self.session.finalize(&mut self.accumulator) {
            Ok(()) => Ok(self.accumulator.take()),
            Err(e) => {
                self.accumulator.discard();
                Err(e)
            }
        }
    }

    /// Memory held by the engine handle.
    ///
    /// # Errors
    /// - `Usage(Inactive)` after `flush`.
    pub fn memory_size(&self) -> Result<usize> {
        self.session.memory_size()
    }

    pub fn counters(&self) -> &TelemetryCounters {
        self.session.counters()
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.session.telemetry()
    }
}
