//! compression/params.rs
//! Engine parameters handed to `CompressionEngine::open`.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LEVEL_ZSTD;

/// Compression parameters applied when an engine handle is opened.
///
/// Validation is left to the engine: an engine that rejects a value reports
/// it from `open` as `StreamError::CodecInitFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionParams {
    /// Engine-specific compression level.
    pub level: i32,
    /// Append a content checksum to the frame.
    pub write_checksum: bool,
    /// Record the source size in the frame header when it is known up front.
    pub write_content_size: bool,
    /// Explicit window size as a power of two; `None` lets the engine pick.
    pub window_log: Option<u32>,
}

impl Default for CompressionParams {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL_ZSTD,
            write_checksum: false,
            write_content_size: true,
            window_log: None,
        }
    }
}

impl CompressionParams {
    pub fn with_level(level: i32) -> Self {
        Self { level, ..Self::default() }
    }

    pub fn checksum(mut self, enabled: bool) -> Self {
        self.write_checksum = enabled;
        self
    }

    pub fn content_size(mut self, enabled: bool) -> Self {
        self.write_content_size = enabled;
        self
    }

    pub fn window_log(mut self, window_log: Option<u32>) -> Self {
        self.window_log = window_log;
        self
    }
}
