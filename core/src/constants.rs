//! constants.rs
//! Defaults and loop bounds shared by both adapters.

/// Default zstd compression level (matches libzstd's own default).
pub const DEFAULT_LEVEL_ZSTD: i32 = 3;

/// Consecutive engine calls allowed to report neither consumed input nor
/// produced output before the drive loop gives up.
pub const MAX_STALLED_ITERATIONS: usize = 1;

/// Block size used by the store-only engine (128 KiB, the zstd block maximum).
pub const STORED_BLOCK_SIZE: usize = 128 * 1024;

/// Magic prefix of a stored frame.
pub const STORED_MAGIC: [u8; 4] = *b"ZST0";

/// Upper bound accepted for an explicit scratch buffer size (32 MiB).
pub const MAX_WRITE_SIZE: usize = 32 * 1024 * 1024;
