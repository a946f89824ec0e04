//! Stage functions shared by the sequential and concurrent compressors.

use log::debug;

use crate::bitstream::{capacity_for_bits, BitStream};
use crate::frequency::FrequencyTable;
use crate::huffman::{CodeTable, HuffmanTree};
use crate::PzResult;

/// Build the Huffman tree for `freq` and return its code table.
pub(crate) fn build_code_table(freq: &FrequencyTable) -> PzResult<CodeTable> {
    let mut tree = HuffmanTree::new(freq);
    tree.build();
    let mut table = CodeTable::new();
    tree.generate_dict(&mut table)?;
    debug!(
        "code table: {} symbols, {} internal nodes, longest code {} bits",
        tree.leaf_count(),
        tree.internal_count(),
        table.max_length()
    );
    Ok(table)
}

/// Allocate a stream big enough to encode the bytes counted in `freq`.
pub(crate) fn allocate_stream(freq: &FrequencyTable, table: &CodeTable) -> PzResult<BitStream> {
    BitStream::new(capacity_for_bits(freq.encoded_bits(table)))
}

/// Push the code of every byte of `input`, in order.
pub(crate) fn encode_into(input: &[u8], table: &CodeTable, stream: &mut BitStream) -> PzResult<()> {
    for &byte in input {
        let entry = table[byte];
        stream.push_code(entry.code, entry.length)?;
    }
    Ok(())
}
