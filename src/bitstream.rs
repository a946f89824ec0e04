//! Fixed-capacity bit stream.
//!
//! Bits are packed MSB-first into a zero-filled byte buffer whose size is
//! chosen up front. Writes never grow the buffer: anything that would land
//! past the last byte is rejected with [`PzError::BufferOverflow`].
//!
//! `push_chunk` always rewrites two bytes (the byte holding the write
//! position and the one after it), so a stream that receives chunk writes
//! needs one spare trailing byte beyond the bits it will hold. See
//! [`capacity_for_bits`].

use std::fmt;

use crate::{PzError, PzResult};

/// Byte capacity for a stream that will receive `bits` bits via `push_chunk`.
pub fn capacity_for_bits(bits: u64) -> usize {
    bits.div_ceil(8) as usize + 1
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    /// Zero-filled backing store; its length is the capacity.
    buffer: Vec<u8>,
    /// Number of bits written so far.
    bit_offset: u64,
}

impl BitStream {
    /// Allocate a zero-filled stream of `capacity` bytes.
    pub fn new(capacity: usize) -> PzResult<Self> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|_| PzError::AllocationFailure { bytes: capacity })?;
        buffer.resize(capacity, 0);
        Ok(BitStream {
            buffer,
            bit_offset: 0,
        })
    }

    /// Capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of bits written.
    pub fn bit_len(&self) -> u64 {
        self.bit_offset
    }

    /// Number of bytes touched by the written bits.
    pub fn byte_len(&self) -> usize {
        self.bit_offset.div_ceil(8) as usize
    }

    /// The written bytes; unused low bits of the last byte are zero.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.byte_len()]
    }

    /// Consume the stream, keeping only the written bytes.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.buffer.truncate(self.byte_len());
        self.buffer
    }

    /// Append the low `bit_length` bits of `chunk`, most significant first.
    ///
    /// The chunk is left-justified in a 16-bit window, shifted right by the
    /// current bit position within the byte and OR-ed over that byte; both
    /// halves of the window are then stored.
    pub fn push_chunk(&mut self, chunk: u8, bit_length: u8) -> PzResult<()> {
        if bit_length > 8 {
            return Err(PzError::InvalidBitLength(bit_length));
        }
        if bit_length == 0 {
            return Ok(());
        }

        let byte_index = (self.bit_offset / 8) as usize;
        let bit_in_byte = (self.bit_offset % 8) as u32;
        if byte_index + 1 >= self.buffer.len() {
            return Err(PzError::BufferOverflow {
                required: byte_index + 2,
                capacity: self.buffer.len(),
            });
        }

        let value = chunk as u16 & ((1u16 << bit_length) - 1);
        let shifted = (value << (16 - bit_length as u32)) >> bit_in_byte;
        let window = ((self.buffer[byte_index] as u16) << 8) | shifted;

        self.buffer[byte_index] = (window >> 8) as u8;
        self.buffer[byte_index + 1] = (window & 0xFF) as u8;
        self.bit_offset += bit_length as u64;
        Ok(())
    }

    /// Append the low `length` bits of `code` as a sequence of chunks of at
    /// most 8 bits, most significant chunk first.
    pub fn push_code(&mut self, code: u64, length: u8) -> PzResult<()> {
        let mut remaining = length;
        while remaining > 0 {
            let take = remaining.min(8);
            remaining -= take;
            self.push_chunk((code >> remaining) as u8, take)?;
        }
        Ok(())
    }

    /// Concatenate the written bits of `other` onto the end of this stream.
    ///
    /// Works at bit granularity: when this stream ends mid-byte, every
    /// source byte is split across two destination bytes. Needs
    /// `ceil((self.bit_len() + other.bit_len()) / 8)` bytes of capacity and
    /// writes nothing beyond that.
    pub fn append(&mut self, other: &BitStream) -> PzResult<()> {
        let src = other.as_bytes();
        if src.is_empty() {
            return Ok(());
        }

        let total_bits = self.bit_offset + other.bit_offset;
        let required = total_bits.div_ceil(8) as usize;
        if required > self.buffer.len() {
            return Err(PzError::BufferOverflow {
                required,
                capacity: self.buffer.len(),
            });
        }

        let start = (self.bit_offset / 8) as usize;
        let shift = (self.bit_offset % 8) as u32;

        if shift == 0 {
            self.buffer[start..start + src.len()].copy_from_slice(src);
        } else {
            self.buffer[start] |= src[0] >> shift;
            for (i, &byte) in src.iter().enumerate() {
                let dst = start + 1 + i;
                if dst >= required {
                    break;
                }
                let lead = src.get(i + 1).map_or(0, |&next| next >> shift);
                self.buffer[dst] = (byte << (8 - shift)) | lead;
            }
        }

        self.bit_offset = total_bits;
        Ok(())
    }
}

/// Binary dump of the written bytes.
impl fmt::Display for BitStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "offset={}", self.bit_offset)?;
        write!(f, "[ ")?;
        for byte in self.as_bytes() {
            write!(f, "{byte:08b} ")?;
        }
        write!(f, "]")
    }
}
