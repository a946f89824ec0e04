//! Byte-oriented Huffman coding with two interchangeable pipelines.
//!
//! The sequential pipeline counts, builds the code table and encodes on the
//! calling thread. The parallel pipeline splits the input into contiguous
//! partitions, counts and encodes them on scoped worker threads and stitches
//! the per-worker bit streams back together in partition order, so both
//! produce the same bits for the same input.
//!
//! ```
//! use huffpar::pipeline;
//!
//! let input = b"abracadabra";
//! let serial = pipeline::compress(input).unwrap();
//! let parallel = pipeline::compress_parallel(input, 4).unwrap();
//! assert_eq!(serial, parallel);
//! assert_eq!(serial.bit_len, 23);
//! ```

pub mod bitstream;
pub mod frequency;
pub mod huffman;
pub mod pipeline;
pub mod pqueue;

#[cfg(test)]
mod validation;

pub use bitstream::BitStream;
pub use pipeline::{compress, compress_parallel, compress_with_options, CompressOptions, Compressed};

/// Number of distinct symbols in the alphabet (one per byte value).
pub const ALPHABET_SIZE: usize = 256;

/// Error types for huffpar operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PzError {
    /// A buffer could not be reserved.
    #[error("failed to allocate {bytes} bytes")]
    AllocationFailure { bytes: usize },
    /// A write would run past the end of a fixed-capacity buffer.
    #[error("buffer overflow: need {required} bytes, capacity is {capacity}")]
    BufferOverflow { required: usize, capacity: usize },
    /// A chunk write asked for more than 8 bits.
    #[error("invalid chunk length: {0} bits (max 8)")]
    InvalidBitLength(u8),
    /// A code table was requested from a tree with no symbols.
    #[error("no symbols to build a code table from")]
    EmptyInput,
    /// The tree is deeper than a code entry can hold.
    #[error("code for symbol {symbol:#04x} needs {length} bits (max 64)")]
    CodeTooLong { symbol: u8, length: usize },
    /// A worker thread panicked or poisoned the shared frequency table.
    #[error("compression worker panicked")]
    WorkerPanicked,
}

pub type PzResult<T> = Result<T, PzError>;
