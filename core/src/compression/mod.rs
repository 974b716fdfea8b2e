//! compression/mod.rs
//! Engine contract, engines, and the shared drive loop.
//!
//! - `types`: the `CompressionEngine` trait every adapter is generic over.
//! - `buffer`: scratch output buffer and result accumulator.
//! - `drive`: body/finalize loops against a stateful engine.
//! - `session`: handle + scratch ownership with idempotent close.

pub mod buffer;
pub mod codecs;
pub mod drive;
pub mod params;
pub mod session;
pub mod types;

pub use buffer::{ResultAccumulator, ScratchBuffer};
pub use codecs::{StoredEngine, ZstdEngine};
pub use drive::{ChunkSink, EngineDriver, ForwardSink};
pub use params::CompressionParams;
pub use session::EngineSession;
pub use types::{CompressionEngine, FeedProgress, FinishProgress};
