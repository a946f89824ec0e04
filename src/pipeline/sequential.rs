//! Single-threaded compression: count, build the table, encode.

use log::debug;

use super::stages::{allocate_stream, build_code_table, encode_into};
use super::Compressed;
use crate::bitstream::BitStream;
use crate::frequency::{get_frequency, FrequencyTable};
use crate::huffman::CodeTable;
use crate::PzResult;

/// Compresses a borrowed input into one owned bit stream.
#[derive(Debug)]
pub struct SequentialCompressor<'a> {
    input: &'a [u8],
    table: CodeTable,
    output: BitStream,
}

impl<'a> SequentialCompressor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        SequentialCompressor {
            input,
            table: CodeTable::new(),
            output: BitStream::default(),
        }
    }

    /// Byte frequencies of the whole input.
    pub fn count_frequencies(&self) -> FrequencyTable {
        get_frequency(self.input)
    }

    /// Run every stage, replacing any previous table and output.
    ///
    /// Empty input leaves an empty table and a zero-length output.
    pub fn digest(&mut self) -> PzResult<()> {
        self.table = CodeTable::new();
        self.output = BitStream::default();
        if self.input.is_empty() {
            return Ok(());
        }

        let freq = self.count_frequencies();
        debug!("sequential: counted {} bytes, {} distinct", freq.total, freq.used);

        let table = build_code_table(&freq)?;
        let mut output = allocate_stream(&freq, &table)?;
        encode_into(self.input, &table, &mut output)?;
        debug!("sequential: encoded {} bits", output.bit_len());

        self.table = table;
        self.output = output;
        Ok(())
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.table
    }

    pub fn output(&self) -> &BitStream {
        &self.output
    }

    pub fn finish(self) -> Compressed {
        self.output.into()
    }
}
