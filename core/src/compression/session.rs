//! compression/session.rs
//! Ownership of one engine handle and its scratch buffer.
//!
//! Summary:
//! - The handle and scratch buffer are created together on `open` and
//!   released together on `finalize`/`close`.
//! - `close` is idempotent: the handle slot is emptied before the engine
//!   releases it, so a later teardown path sees "already closed".
//! - Dropping the session closes a still-open handle.

use std::time::Instant;

use tracing::debug;

use crate::compression::buffer::ScratchBuffer;
use crate::compression::drive::{ChunkSink, EngineDriver};
use crate::compression::types::CompressionEngine;
use crate::config::StreamConfig;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::{Result, StreamError, UsageError};

pub struct EngineSession<E: CompressionEngine> {
    engine: E,
    handle: Option<E::Handle>,
    scratch: Option<ScratchBuffer>,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
}

impl<E: CompressionEngine> EngineSession<E> {
    /// A session with no open handle.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            handle: None,
            scratch: None,
            counters: TelemetryCounters::default(),
            timer: TelemetryTimer::new(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Open a handle and allocate the scratch buffer.
    ///
    /// A handle left open by an earlier abandoned scope is closed first.
    pub fn open(&mut self, config: &StreamConfig) -> Result<()> {
        config.validate()?;
        if self.close() {
            debug!(codec = self.engine.name(), "closed stale stream before reopening");
        }

        let write_size = config.resolve_write_size(self.engine.recommended_output_size());
        let scratch = ScratchBuffer::try_with_capacity(write_size)?;

        let started = Instant::now();
        let handle = self.engine.open(&config.params, config.source_size)?;
        self.timer.add_stage_time(Stage::Open, started.elapsed());

        self.handle = Some(handle);
        self.scratch = Some(scratch);
        debug!(
            codec = self.engine.name(),
            level = config.params.level,
            write_size,
            source_size = ?config.source_size,
            "opened compression stream"
        );
        Ok(())
    }

    /// Body phase: feed `input` and deliver produced chunks to `sink`.
    pub fn feed_all<S: ChunkSink + ?Sized>(&mut self, input: &[u8], sink: &mut S) -> Result<usize> {
        let (Some(handle), Some(scratch)) = (self.handle.as_mut(), self.scratch.as_mut()) else {
            return Err(UsageError::Inactive.into());
        };

        EngineDriver {
            engine: &self.engine,
            handle,
            scratch,
            counters: &mut self.counters,
            timer: &mut self.timer,
        }
        .feed_all(input, sink)
    }

    /// Finalize phase: drain the epilogue into `sink`, then release the
    /// handle. Handle ownership ends here whether or not finishing succeeded.
    pub fn finalize<S: ChunkSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let Some(mut handle) = self.handle.take() else {
            return Err(UsageError::Inactive.into());
        };

        let result = match self.scratch.as_mut() {
            Some(scratch) => EngineDriver {
                engine: &self.engine,
                handle: &mut handle,
                scratch,
                counters: &mut self.counters,
                timer: &mut self.timer,
            }
            .finish_all(sink),
            None => Err(StreamError::Invariant("open stream without a scratch buffer".into())),
        };

        self.engine.close(handle);
        self.scratch = None;
        debug!(codec = self.engine.name(), ok = result.is_ok(), "finalized compression stream");
        result
    }

    /// Release the handle without finalizing. Returns `false` if nothing
    /// was open.
    pub fn close(&mut self) -> bool {
        self.scratch = None;
        match self.handle.take() {
            Some(handle) => {
                self.engine.close(handle);
                debug!(codec = self.engine.name(), "closed compression stream");
                true
            }
            None => false,
        }
    }

    /// Memory held by the open handle.
    ///
    /// # Errors
    /// - `Usage(Inactive)` when no handle is open.
    pub fn memory_size(&self) -> Result<usize> {
        self.handle
            .as_ref()
            .map(|handle| self.engine.memory_footprint(handle))
            .ok_or(StreamError::Usage(UsageError::Inactive))
    }

    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }
}

impl<E: CompressionEngine> Drop for EngineSession<E> {
    fn drop(&mut self) {
        self.close();
    }
}
