//! zstream-core
//!
//! Streaming compression adapters over incremental, block-oriented engines.
//!
//! - `StreamingSink` forwards compressed bytes to a writer as they are
//!   produced, inside an enter/exit scope.
//! - `IncrementalCompressor` returns compressed bytes from each
//!   `compress`/`flush` call.
//!
//! Both drive a `CompressionEngine` (zstd via `zstd-safe`, or the store-only
//! engine) through the same body/finalize loop.

#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod types;

pub mod compression;
pub mod stream;
pub mod telemetry;

pub use compression::{CompressionEngine, CompressionParams, StoredEngine, ZstdEngine};
pub use config::StreamConfig;
pub use stream::{IncrementalCompressor, ScopeExit, SinkScope, StreamCompressor, StreamingSink};
pub use types::{Result, StreamError, UsageError};
