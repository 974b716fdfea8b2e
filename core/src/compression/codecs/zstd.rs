//! src/compression/codecs/zstd.rs
//!
//! Zstd engine over zstd-safe's streaming context.
//!
//! Design notes:
//! - The handle is a `CCtx`; dropping it frees the native context.
//! - Feed uses `compress_stream2` with `Continue`; finish uses `end_stream`,
//!   whose return value is the number of epilogue bytes still pending.
//! - Native error codes are mapped into `StreamError` variants carrying
//!   `get_error_name` diagnostics.

use zstd_safe::zstd_sys::ZSTD_EndDirective;
use zstd_safe::{CCtx, CParameter, ErrorCode, InBuffer, OutBuffer};

use crate::compression::params::CompressionParams;
use crate::compression::types::{CompressionEngine, FeedProgress, FinishProgress};
use crate::types::{Result, StreamError};

const CODEC: &str = "zstd";

/// Zstd streaming compression engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZstdEngine;

fn error_name(code: ErrorCode) -> &'static str {
    zstd_safe::get_error_name(code)
}

fn init_failed(what: &str, code: ErrorCode) -> StreamError {
    StreamError::CodecInitFailed {
        codec: CODEC,
        msg: format!("could not create compression stream ({what}): {}", error_name(code)),
    }
}

impl CompressionEngine for ZstdEngine {
    type Handle = CCtx<'static>;

    fn name(&self) -> &'static str {
        CODEC
    }

    fn open(&self, params: &CompressionParams, source_size: Option<u64>) -> Result<Self::Handle> {
        let mut cctx = CCtx::try_create().ok_or(StreamError::Allocation {
            context: "zstd compression context",
            requested: 0,
        })?;

        cctx.set_parameter(CParameter::CompressionLevel(params.level))
            .map_err(|code| init_failed("compression level", code))?;
        cctx.set_parameter(CParameter::ChecksumFlag(params.write_checksum))
            .map_err(|code| init_failed("checksum flag", code))?;
        cctx.set_parameter(CParameter::ContentSizeFlag(params.write_content_size))
            .map_err(|code| init_failed("content size flag", code))?;
        if let Some(window_log) = params.window_log {
            cctx.set_parameter(CParameter::WindowLog(window_log))
                .map_err(|code| init_failed("window log", code))?;
        }
        cctx.set_pledged_src_size(source_size)
            .map_err(|code| init_failed("pledged source size", code))?;

        Ok(cctx)
    }

    fn feed(&self, cctx: &mut Self::Handle, input: &[u8], output: &mut [u8]) -> Result<FeedProgress> {
        let mut in_buf = InBuffer::around(input);
        let mut out_buf = OutBuffer::around(output);

        cctx.compress_stream2(&mut out_buf, &mut in_buf, ZSTD_EndDirective::ZSTD_e_continue)
            .map_err(|code| StreamError::CodecProcessFailed {
                codec: CODEC,
                msg: format!("zstd compress error: {}", error_name(code)),
            })?;

        Ok(FeedProgress {
            consumed: in_buf.pos(),
            produced: out_buf.pos(),
        })
    }

    fn finish(&self, cctx: &mut Self::Handle, output: &mut [u8]) -> Result<FinishProgress> {
        let mut out_buf = OutBuffer::around(output);

        let pending = cctx.end_stream(&mut out_buf)
            .map_err(|code| StreamError::CodecFinishFailed {
                codec: CODEC,
                msg: format!("error ending compression stream: {}", error_name(code)),
            })?;

        Ok(FinishProgress {
            produced: out_buf.pos(),
            pending,
        })
    }

    fn close(&self, cctx: Self::Handle) {
        drop(cctx);
    }

    fn memory_footprint(&self, cctx: &Self::Handle) -> usize {
        cctx.sizeof()
    }

    fn recommended_output_size(&self) -> usize {
        CCtx::out_size()
    }
}
