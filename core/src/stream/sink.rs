//! stream/sink.rs
//! Push-style adapter: compressed bytes are forwarded to a downstream
//! writer as soon as the engine produces them.
//!
//! States: unopened → entered → exited (→ entered again).
//! - `enter` opens the engine handle; entering twice is a usage error.
//! - Normal exit finalizes the stream and forwards the epilogue.
//! - Abnormal exit skips finalization; the handle stays open until the
//!   sink is re-entered or dropped.

use std::io::{self, Write};

use tracing::debug;

use crate::compression::{CompressionEngine, EngineSession, ForwardSink};
use crate::config::StreamConfig;
use crate::telemetry::{TelemetryCounters, TelemetrySnapshot};
use crate::types::{Result, StreamError, UsageError};

/// How a compression scope is being left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeExit {
    /// The caller finished without error: finalize and forward the epilogue.
    Normal,
    /// The caller is unwinding from an error: do not finalize.
    Abnormal,
}

impl ScopeExit {
    /// `Abnormal` when an error is present.
    pub fn from_error<E>(error: Option<&E>) -> Self {
        if error.is_some() { ScopeExit::Abnormal } else { ScopeExit::Normal }
    }
}

/// Scoped compressing writer over a downstream `W`.
pub struct StreamingSink<W: Write, E: CompressionEngine> {
    writer: W,
    session: EngineSession<E>,
    config: StreamConfig,
    entered: bool,
}

impl<W: Write, E: CompressionEngine> StreamingSink<W, E> {
    /// Create an unopened sink. No engine resources are held until `enter`.
    pub fn new(writer: W, engine: E, config: StreamConfig) -> Self {
        Self {
            writer,
            session: EngineSession::new(engine),
            config,
            entered: false,
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Open the engine handle and start accepting writes.
    ///
    /// # Errors
    /// - `Usage(AlreadyEntered)` if the sink is already entered.
    /// - Engine open / allocation / validation errors; the sink stays unentered.
    pub fn enter(&mut self) -> Result<()> {
        if self.entered {
            return Err(UsageError::AlreadyEntered.into());
        }
        self.session.open(&self.config)?;
        self.entered = true;
        Ok(())
    }

    /// Leave the scope.
    ///
    /// On `Normal`, runs the finalize protocol forwarding the epilogue; the
    /// handle is closed afterwards even if finalizing failed. On `Abnormal`,
    /// nothing is forwarded and the handle is left for teardown.
    ///
    /// # Errors
    /// - `Usage(NotEntered)` if the sink is not entered.
    /// - Engine finish or sink I/O errors (normal exit only).
    pub fn exit(&mut self, how: ScopeExit) -> Result<()> {
        if !self.entered {
            return Err(UsageError::NotEntered.into());
        }
        self.entered = false;

        match how {
            ScopeExit::Normal => {
                let mut sink = ForwardSink::new(&mut self.writer);
                self.session.finalize(&mut sink)
            }
            ScopeExit::Abnormal => {
                debug!(codec = self.session.engine().name(), "scope abandoned; finalize skipped");
                Ok(())
            }
        }
    }

    /// Compress `data`, forwarding produced bytes downstream.
    ///
    /// Returns the number of input bytes consumed, which is `data.len()` on
    /// success.
    ///
    /// # Errors
    /// - `Usage(NotEntered)` outside an entered scope.
    /// - Engine feed or sink I/O errors. Chunks forwarded before the error
    ///   stay forwarded.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.write_chunk(data)
    }

    fn write_chunk(&mut self, data: &[u8]) -> Result<usize> {
        if !self.entered {
            return Err(UsageError::NotEntered.into());
        }
        let mut sink = ForwardSink::new(&mut self.writer);
        self.session.feed_all(data, &mut sink)
    }

    /// Memory held by the engine handle.
    ///
    /// # Errors
    /// - `Usage(Inactive)` when no handle is open.
    pub fn memory_size(&self) -> Result<usize> {
        self.session.memory_size()
    }

    /// Enter and return a guard that exits abnormally unless `finish`ed.
    pub fn scope(&mut self) -> Result<SinkScope<'_, W, E>> {
        self.enter()?;
        Ok(SinkScope { sink: self, done: false })
    }

    /// Run `f` inside an entered scope. `Ok` exits normally, `Err` exits
    /// abnormally and is returned unchanged. A panic in `f` unwinds through
    /// the scope guard, which exits abnormally.
    pub fn with_scope<T, X, F>(&mut self, f: F) -> std::result::Result<T, X>
    where
        F: FnOnce(&mut Self) -> std::result::Result<T, X>,
        X: From<StreamError>,
    {
        let mut scope = self.scope()?;
        let result = f(&mut *scope.sink);
        scope.close(ScopeExit::from_error(result.as_ref().err()))?;
        result
    }

    pub fn counters(&self) -> &TelemetryCounters {
        self.session.counters()
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.session.telemetry()
    }
}

impl<W: Write, E: CompressionEngine> Write for StreamingSink<W, E> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_chunk(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Guard for an entered `StreamingSink`.
///
/// `finish` is the normal exit. Dropping the guard any other way (early
/// return, `?`, panic) is an abnormal exit.
pub struct SinkScope<'a, W: Write, E: CompressionEngine> {
    sink: &'a mut StreamingSink<W, E>,
    done: bool,
}

impl<W: Write, E: CompressionEngine> SinkScope<'_, W, E> {
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.sink.write_chunk(data)
    }

    pub fn memory_size(&self) -> Result<usize> {
        self.sink.memory_size()
    }

    /// Normal exit: finalize and forward the epilogue.
    pub fn finish(self) -> Result<()> {
        self.close(ScopeExit::Normal)
    }

    fn close(mut self, how: ScopeExit) -> Result<()> {
        self.done = true;
        if how == ScopeExit::Abnormal && !self.sink.entered {
            return Ok(());
        }
        self.sink.exit(how)
    }
}

impl<W: Write, E: CompressionEngine> Drop for SinkScope<'_, W, E> {
    fn drop(&mut self) {
        if !self.done && self.sink.entered {
            self.sink.entered = false;
            debug!(codec = self.sink.session.engine().name(), "scope guard dropped; finalize skipped");
        }
    }
}
