//! Compression pipeline orchestrator.
//!
//! Both strategies run the same three stages:
//!
//! | Stage              | Sequential      | Concurrent                          |
//! |--------------------|-----------------|-------------------------------------|
//! | count frequencies  | one pass        | per-partition, mutex-guarded reduce |
//! | build tree + table | once            | once, after every worker has counted|
//! | encode             | one bit stream  | one private stream per partition    |
//!
//! The concurrent strategy finishes with a serial merge that appends the
//! private streams in partition order, which reproduces the sequential bit
//! sequence exactly.
//!
//! **Output format:** the raw packed code stream, MSB-first, with the last
//! byte zero-padded. No header, code table or frequency table is written;
//! `bit_len` is the only framing information returned.

mod parallel;
mod sequential;
mod stages;


use crate::bitstream::BitStream;
use crate::PzResult;

pub use parallel::{partition, ConcurrentCompressor};
pub use sequential::SequentialCompressor;

/// Options controlling pipeline compression behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressOptions {
    /// Number of worker threads. 0 = auto (use all available cores),
    /// 1 = sequential pipeline.
    pub threads: usize,
}

/// Packed output of a compression call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compressed {
    /// Packed code bits; `bytes.len() == bit_len.div_ceil(8)`.
    pub bytes: Vec<u8>,
    /// Exact number of meaningful bits in `bytes`.
    pub bit_len: u64,
}

impl From<BitStream> for Compressed {
    fn from(stream: BitStream) -> Self {
        let bit_len = stream.bit_len();
        Compressed {
            bytes: stream.into_bytes(),
            bit_len,
        }
    }
}

/// Compress `input` on the calling thread.
pub fn compress(input: &[u8]) -> PzResult<Compressed> {
    let mut compressor = SequentialCompressor::new(input);
    compressor.digest()?;
    Ok(compressor.finish())
}

/// Compress `input` with `workers` threads (0 = auto).
///
/// The result is identical to [`compress`] for every worker count.
pub fn compress_parallel(input: &[u8], workers: usize) -> PzResult<Compressed> {
    let mut compressor = ConcurrentCompressor::new(input, workers);
    compressor.digest()?;
    Ok(compressor.finish())
}

/// Compress with explicit options, picking the sequential pipeline when only
/// one thread is requested or available.
pub fn compress_with_options(input: &[u8], options: &CompressOptions) -> PzResult<Compressed> {
    let threads = resolve_thread_count(options.threads);
    if threads <= 1 {
        compress(input)
    } else {
        compress_parallel(input, threads)
    }
}

/// Resolve thread count: 0 = auto (available_parallelism), otherwise use the given value.
pub fn resolve_thread_count(threads: usize) -> usize {
    if threads == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    } else {
        threads
    }
}
