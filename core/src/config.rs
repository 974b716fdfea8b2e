//! config.rs
//! Adapter configuration.
//!
//! Summary: bundles the engine parameters with the adapter-level knobs
//! (pledged source size, scratch buffer size). Option fields follow the
//! "None means engine default" convention.

use serde::{Deserialize, Serialize};

use crate::compression::CompressionParams;
use crate::constants::MAX_WRITE_SIZE;
use crate::types::{Result, StreamError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Parameters passed to the engine when a handle is opened.
    pub params: CompressionParams,

    /// Total input size, when known before the first write.
    /// - `None` → size unknown (streaming default).
    /// - `Some(n)` → pledged to the engine; a mismatch fails at finalize.
    pub source_size: Option<u64>,

    /// Scratch buffer capacity in bytes.
    /// - `None` → the engine's recommended output size.
    pub write_size: Option<usize>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            params: CompressionParams::default(),
            source_size: None,
            write_size: None,
        }
    }
}

impl StreamConfig {
    pub fn new(
        params: CompressionParams,
        source_size: Option<u64>,
        write_size: Option<usize>,
    ) -> Self {
        Self { params, source_size, write_size }
    }

    pub fn with_level(level: i32) -> Self {
        Self {
            params: CompressionParams::with_level(level),
            ..Self::default()
        }
    }

    /// Parse a JSON document; missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: StreamConfig = serde_json::from_str(json)
            .map_err(|e| StreamError::Validation(format!("config parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| StreamError::Validation(format!("config encode error: {e}")))
    }

    /// Check the adapter-level fields. Engine parameters are checked by the
    /// engine itself when a handle is opened.
    pub fn validate(&self) -> Result<()> {
        match self.write_size {
            Some(0) => Err(StreamError::Validation("write_size must be non-zero".into())),
            Some(n) if n > MAX_WRITE_SIZE => Err(StreamError::Validation(format!(
                "write_size too large: {} > {}",
                n, MAX_WRITE_SIZE
            ))),
            _ => Ok(()),
        }
    }

    /// Scratch capacity to allocate, given the engine's own hint.
    pub fn resolve_write_size(&self, engine_hint: usize) -> usize {
        self.write_size.unwrap_or(engine_hint).max(1)
    }
}
