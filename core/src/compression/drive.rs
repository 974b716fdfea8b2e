//! compression/drive.rs
//! Drive an engine over caller input (body phase) and to completion
//! (finalize phase), handing every produced chunk to a `ChunkSink`.
//!
//! Summary:
//! - One scratch buffer is reused for every engine call; produced bytes are
//!   copied out to the sink immediately and the cursor reset to zero.
//! - Body phase ends when the engine has consumed all input for the call.
//! - Finalize phase ends when the engine reports nothing pending.
//! - An engine that makes no progress twice in a row is an invariant error.

use std::io::Write;
use std::time::Instant;

use tracing::{trace, warn};

use crate::compression::buffer::{ResultAccumulator, ScratchBuffer};
use crate::compression::types::CompressionEngine;
use crate::constants::MAX_STALLED_ITERATIONS;
use crate::telemetry::{Stage, TelemetryCounters, TelemetryTimer};
use crate::types::{Result, StreamError};

/// Destination for produced output chunks. Never called with an empty chunk.
pub trait ChunkSink {
    fn deliver(&mut self, chunk: &[u8]) -> Result<()>;
}

impl ChunkSink for ResultAccumulator {
    fn deliver(&mut self, chunk: &[u8]) -> Result<()> {
        self.append(chunk)
    }
}

/// Forwards every chunk to a downstream writer, in order, before the next
/// engine call.
pub struct ForwardSink<'a, W: Write + ?Sized> {
    writer: &'a mut W,
}

impl<'a, W: Write + ?Sized> ForwardSink<'a, W> {
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<W: Write + ?Sized> ChunkSink for ForwardSink<'_, W> {
    fn deliver(&mut self, chunk: &[u8]) -> Result<()> {
        self.writer.write_all(chunk).map_err(StreamError::Sink)
    }
}

/// Borrowed view over everything one engine call needs.
pub struct EngineDriver<'a, E: CompressionEngine> {
    pub engine: &'a E,
    pub handle: &'a mut E::Handle,
    pub scratch: &'a mut ScratchBuffer,
    pub counters: &'a mut TelemetryCounters,
    pub timer: &'a mut TelemetryTimer,
}

impl<E: CompressionEngine> EngineDriver<'_, E> {
    /// Feed all of `input` through the engine.
    ///
    /// Returns the number of input bytes consumed (always `input.len()` on
    /// success). On error, chunks already delivered stay delivered; nothing
    /// further is delivered.
    pub fn feed_all<S: ChunkSink + ?Sized>(&mut self, input: &[u8], sink: &mut S) -> Result<usize> {
        let mut consumed = 0usize;
        let mut stalled = 0usize;

        while consumed < input.len() {
            let remaining = &input[consumed..];
            self.scratch.clear();
            let capacity = self.scratch.capacity();

            let started = Instant::now();
            let result = self.engine.feed(self.handle, remaining, self.scratch.writable());
            self.timer.add_stage_time(Stage::Feed, started.elapsed());

            let progress = match result {
                Ok(progress) => progress,
                Err(e) => {
                    warn!(codec = self.engine.name(), error = %e, "feed aborted");
                    return Err(e);
                }
            };

            if progress.consumed > remaining.len() || progress.produced > capacity {
                return Err(StreamError::Invariant(format!(
                    "{} feed reported consumed={} of {}, produced={} of {}",
                    self.engine.name(),
                    progress.consumed,
                    remaining.len(),
                    progress.produced,
                    capacity
                )));
            }

            self.counters.add_feed(progress.consumed);
            self.deliver(progress.produced, sink)?;
            consumed += progress.consumed;

            stalled = if progress.consumed == 0 && progress.produced == 0 { stalled + 1 } else { 0 };
            if stalled > MAX_STALLED_ITERATIONS {
                return Err(StreamError::Invariant(format!(
                    "{} feed made no progress for {} consecutive calls ({} of {} bytes consumed)",
                    self.engine.name(),
                    stalled,
                    consumed,
                    input.len()
                )));
            }
        }

        Ok(consumed)
    }

    /// Run the finish step until the engine reports nothing pending.
    ///
    /// Does not close the handle; the caller owns teardown.
    pub fn finish_all<S: ChunkSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let mut stalled = 0usize;

        loop {
            self.scratch.clear();
            let capacity = self.scratch.capacity();

            let started = Instant::now();
            let result = self.engine.finish(self.handle, self.scratch.writable());
            self.timer.add_stage_time(Stage::Finish, started.elapsed());

            let progress = match result {
                Ok(progress) => progress,
                Err(e) => {
                    warn!(codec = self.engine.name(), error = %e, "finish aborted");
                    return Err(e);
                }
            };

            if progress.produced > capacity {
                return Err(StreamError::Invariant(format!(
                    "{} finish reported produced={} of {}",
                    self.engine.name(),
                    progress.produced,
                    capacity
                )));
            }

            self.counters.add_finish();
            self.deliver(progress.produced, sink)?;

            if progress.is_done() {
                return Ok(());
            }

            stalled = if progress.produced == 0 { stalled + 1 } else { 0 };
            if stalled > MAX_STALLED_ITERATIONS {
                return Err(StreamError::Invariant(format!(
                    "{} finish made no progress for {} consecutive calls ({} bytes pending)",
                    self.engine.name(),
                    stalled,
                    progress.pending
                )));
            }
        }
    }

    fn deliver<S: ChunkSink + ?Sized>(&mut self, produced: usize, sink: &mut S) -> Result<()> {
        if produced == 0 {
            return Ok(());
        }

        self.scratch.advance(produced);
        let started = Instant::now();
        let delivered = sink.deliver(self.scratch.readable());
        self.timer.add_stage_time(Stage::Deliver, started.elapsed());
        self.scratch.clear();
        delivered?;

        self.counters.add_chunk(produced);
        trace!(codec = self.engine.name(), bytes = produced, "delivered chunk");
        Ok(())
    }
}
