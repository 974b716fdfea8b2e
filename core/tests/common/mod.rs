//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use zstream_core::compression::{CompressionEngine, CompressionParams, FeedProgress, FinishProgress};
use zstream_core::constants::STORED_MAGIC;
use zstream_core::{Result, StreamError};

/// Call counts shared between a `TrackingEngine` and the test body.
#[derive(Debug, Default)]
pub struct EngineStats {
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub feeds: AtomicUsize,
    pub finishes: AtomicUsize,
}

impl EngineStats {
    pub fn opens(&self) -> usize { self.opens.load(Ordering::SeqCst) }
    pub fn closes(&self) -> usize { self.closes.load(Ordering::SeqCst) }
    pub fn feeds(&self) -> usize { self.feeds.load(Ordering::SeqCst) }
    pub fn finishes(&self) -> usize { self.finishes.load(Ordering::SeqCst) }
    pub fn open_handles(&self) -> usize { self.opens() - self.closes() }
}

/// Failure injection knobs.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    pub fail_open: bool,
    /// Fail the feed call with this zero-based index.
    pub fail_feed_at: Option<usize>,
    /// Fail the finish call with this zero-based index.
    pub fail_finish_at: Option<usize>,
    /// Report zero progress from every feed call.
    pub stall_feed: bool,
    /// Report zero progress (with bytes pending) from every finish call.
    pub stall_finish: bool,
}

/// Wraps an engine, counting calls and injecting faults.
#[derive(Debug, Clone)]
pub struct TrackingEngine<E> {
    inner: E,
    pub stats: Arc<EngineStats>,
    pub faults: Faults,
}

impl<E> TrackingEngine<E> {
    pub fn new(inner: E) -> Self {
        Self { inner, stats: Arc::new(EngineStats::default()), faults: Faults::default() }
    }

    pub fn with_faults(inner: E, faults: Faults) -> Self {
        Self { inner, stats: Arc::new(EngineStats::default()), faults }
    }
}

impl<E: CompressionEngine> CompressionEngine for TrackingEngine<E> {
    type Handle = E::Handle;

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn open(&self, params: &CompressionParams, source_size: Option<u64>) -> Result<Self::Handle> {
        if self.faults.fail_open {
            return Err(StreamError::CodecInitFailed { codec: "tracking", msg: "injected open failure".into() });
        }
        let handle = self.inner.open(params, source_size)?;
        self.stats.opens.fetch_add(1, Ordering::SeqCst);
        Ok(handle)
    }

    fn feed(&self, handle: &mut Self::Handle, input: &[u8], output: &mut [u8]) -> Result<FeedProgress> {
        let index = self.stats.feeds.fetch_add(1, Ordering::SeqCst);
        if self.faults.fail_feed_at == Some(index) {
            return Err(StreamError::CodecProcessFailed { codec: "tracking", msg: "injected feed failure".into() });
        }
        if self.faults.stall_feed {
            return Ok(FeedProgress::default());
        }
        self.inner.feed(handle, input, output)
    }

    fn finish(&self, handle: &mut Self::Handle, output: &mut [u8]) -> Result<FinishProgress> {
        let index = self.stats.finishes.fetch_add(1, Ordering::SeqCst);
        if self.faults.fail_finish_at == Some(index) {
            return Err(StreamError::CodecFinishFailed { codec: "tracking", msg: "injected finish failure".into() });
        }
        if self.faults.stall_finish {
            return Ok(FinishProgress { produced: 0, pending: 1 });
        }
        self.inner.finish(handle, output)
    }

    fn close(&self, handle: Self::Handle) {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close(handle);
    }

    fn memory_footprint(&self, handle: &Self::Handle) -> usize {
        self.inner.memory_footprint(handle)
    }

    fn recommended_output_size(&self) -> usize {
        self.inner.recommended_output_size()
    }
}

/// Writer that records each `write` call separately.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub writes: Vec<Vec<u8>>,
}

impl RecordingWriter {
    pub fn concat(&self) -> Vec<u8> {
        self.writes.concat()
    }
}

impl Write for RecordingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes.push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer that fails every write.
#[derive(Debug, Default)]
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "downstream closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Decode a stored frame, checking every block checksum and the trailer.
pub fn decode_stored(frame: &[u8]) -> Vec<u8> {
    assert!(frame.len() >= 4 + 12, "frame too short: {} bytes", frame.len());
    assert_eq!(&frame[..4], &STORED_MAGIC, "bad magic");

    let mut pos = 4;
    let mut out = Vec::new();
    loop {
        let len = u32::from_le_bytes(frame[pos..pos + 4].try_into().unwrap()) as usize;
        pos += 4;
        if len == 0 {
            let total = u64::from_le_bytes(frame[pos..pos + 8].try_into().unwrap());
            pos += 8;
            assert_eq!(total as usize, out.len(), "trailer length mismatch");
            assert_eq!(pos, frame.len(), "trailing garbage after frame");
            return out;
        }
        let payload = &frame[pos..pos + len];
        pos += len;
        let crc = u32::from_le_bytes(frame[pos..pos + 4].try_into().unwrap());
        pos += 4;
        assert_eq!(crc, crc32fast::hash(payload), "block checksum mismatch");
        out.extend_from_slice(payload);
    }
}

/// Deterministic, mildly compressible test payload.
pub fn sample_data(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 31 + i / 7) % 251) as u8).collect()
}
