//! stream/factory.rs
//! A configured compressor that hands out both adapter kinds.

use std::io::Write;

use bytes::{Bytes, BytesMut};

use crate::compression::{CompressionEngine, ZstdEngine};
use crate::config::StreamConfig;
use crate::stream::compressor::IncrementalCompressor;
use crate::stream::sink::StreamingSink;
use crate::types::Result;

/// Engine plus configuration, shared by every adapter it creates.
#[derive(Debug, Clone)]
pub struct StreamCompressor<E: CompressionEngine + Clone> {
    engine: E,
    config: StreamConfig,
}

impl StreamCompressor<ZstdEngine> {
    /// Zstd at `level` with default stream settings.
    pub fn zstd(level: i32) -> Self {
        Self::new(ZstdEngine, StreamConfig::with_level(level))
    }
}

impl<E: CompressionEngine + Clone> StreamCompressor<E> {
    pub fn new(engine: E, config: StreamConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Push-style adapter writing into `writer`.
    pub fn stream_writer<W: Write>(&self, writer: W) -> StreamingSink<W, E> {
        StreamingSink::new(writer, self.engine.clone(), self.config.clone())
    }

    /// Push-style adapter with a pledged source size and scratch size.
    pub fn stream_writer_sized<W: Write>(
        &self,
        writer: W,
        source_size: Option<u64>,
        write_size: Option<usize>,
    ) -> StreamingSink<W, E> {
        let config = StreamConfig::new(self.config.params, source_size, write_size.or(self.config.write_size));
        StreamingSink::new(writer, self.engine.clone(), config)
    }

    /// Pull-style adapter.
    pub fn compressobj(&self) -> Result<IncrementalCompressor<E>> {
        IncrementalCompressor::new(self.engine.clone(), &self.config)
    }

    /// Pull-style adapter with a pledged source size.
    pub fn compressobj_sized(&self, source_size: Option<u64>) -> Result<IncrementalCompressor<E>> {
        let config = StreamConfig::new(self.config.params, source_size, self.config.write_size);
        IncrementalCompressor::new(self.engine.clone(), &config)
    }

    /// Compress `data` into one complete frame.
    pub fn compress(&self, data: &[u8]) -> Result<Bytes> {
        let mut cobj = self.compressobj_sized(Some(data.len() as u64))?;
        let body = cobj.compress(data)?;
        let tail = cobj.flush()?;

        let mut frame = BytesMut::with_capacity(body.len() + tail.len());
        frame.extend_from_slice(&body);
        frame.extend_from_slice(&tail);
        Ok(frame.freeze())
    }
}
