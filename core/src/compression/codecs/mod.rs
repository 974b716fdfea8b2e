//! compression/codecs/mod.rs
//! Engines shipped with the crate.

pub mod stored;
pub mod zstd;

pub use stored::{StoredEngine, StoredStream};
pub use zstd::ZstdEngine;
