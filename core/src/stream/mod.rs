//! stream/mod.rs
//! The two consumption models built on `EngineSession`:
//! - `StreamingSink`: push-style, scoped, forwards to a writer.
//! - `IncrementalCompressor`: pull-style, returns bytes per call.

pub mod compressor;
pub mod factory;
pub mod sink;

pub use compressor::IncrementalCompressor;
pub use factory::StreamCompressor;
pub use sink::{ScopeExit, SinkScope, StreamingSink};
