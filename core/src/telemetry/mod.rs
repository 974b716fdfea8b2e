//! telemetry/mod.rs
//! Per-adapter counters, stage timers, and immutable snapshots.
//!
//! Counters and timers are plain fields owned by one adapter; no locks or
//! atomics are involved since adapters are single-owner.

pub mod counters;
pub mod snapshot;
pub mod timers;

pub use counters::*;
pub use snapshot::*;
pub use timers::*;
