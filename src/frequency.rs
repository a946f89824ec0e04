//! Byte histograms.
//!
//! A [`FrequencyTable`] is the only input the tree builder sees. The
//! parallel pipeline fills one per partition and sums them, so counting is
//! additive: `count(a); count(b)` equals `count(a ++ b)`.

use crate::huffman::CodeTable;
use crate::ALPHABET_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    /// Occurrences, indexed by byte value.
    pub byte: [u64; ALPHABET_SIZE],
    /// Bytes counted so far.
    pub total: u64,
    /// Byte values seen at least once.
    pub used: u32,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            byte: [0u64; ALPHABET_SIZE],
            total: 0,
            used: 0,
        }
    }

    /// Add the byte frequencies of `input` to this table.
    pub fn count(&mut self, input: &[u8]) {
        for &b in input {
            self.byte[b as usize] += 1;
        }
        self.refresh();
    }

    /// Add another table's counts into this one, element-wise.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (mine, theirs) in self.byte.iter_mut().zip(other.byte.iter()) {
            *mine += theirs;
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        self.total = self.byte.iter().sum();
        self.used = self.byte.iter().filter(|&&count| count > 0).count() as u32;
    }

    /// Shannon entropy in bits per byte; 0 for an empty table.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        -self
            .byte
            .iter()
            .filter(|&&count| count > 0)
            .map(|&count| {
                let p = count as f64 / total;
                p * p.log2()
            })
            .sum::<f64>()
    }

    /// Exact number of bits `table` produces for the bytes counted here.
    pub fn encoded_bits(&self, table: &CodeTable) -> u64 {
        self.byte
            .iter()
            .enumerate()
            .map(|(symbol, &count)| count * table[symbol as u8].length as u64)
            .sum()
    }

    pub fn get(&self, byte: u8) -> u64 {
        self.byte[byte as usize]
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Count every byte of `input` into a fresh table.
pub fn get_frequency(input: &[u8]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    table.count(input);
    table
}
