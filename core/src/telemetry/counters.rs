//! telemetry/counters.rs
//! Mutable counters updated by the drive loop.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Byte and call counts collected over an adapter's lifetime.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub feed_calls: u64,
    pub finish_calls: u64,
    pub chunks_out: u64,
}

impl TelemetryCounters {
    /// Record one engine feed call.
    pub fn add_feed(&mut self, consumed: usize) {
        self.feed_calls += 1;
        self.bytes_in += consumed as u64;
    }

    /// Record one engine finish call.
    pub fn add_finish(&mut self) {
        self.finish_calls += 1;
    }

    /// Record one chunk handed to a sink.
    pub fn add_chunk(&mut self, len: usize) {
        self.chunks_out += 1;
        self.bytes_out += len as u64;
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.bytes_in += other.bytes_in;
        self.bytes_out += other.bytes_out;
        self.feed_calls += other.feed_calls;
        self.finish_calls += other.finish_calls;
        self.chunks_out += other.chunks_out;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
