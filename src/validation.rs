/// Validation tests across modules.
///
/// These tests verify:
/// 1. **Equivalence** - the sequential and parallel pipelines emit identical bits
/// 2. **Code properties** - prefix-freeness and Kraft equality on real inputs
/// 3. **Reduction** - parallel counting equals a single pass for any split
/// 4. **Edge cases** - degenerate alphabets, tiny inputs, more workers than bytes
#[cfg(test)]
mod tests {
    use crate::frequency::{self, FrequencyTable};
    use crate::huffman::{CodeTable, HuffmanTree};
    use crate::pipeline::{self, partition};

    use proptest::prelude::*;

    // ---------------------------------------------------------------
    // Helper: generate diverse test vectors
    // ---------------------------------------------------------------

    /// Single byte repeated.
    fn data_all_zeros(n: usize) -> Vec<u8> {
        vec![0u8; n]
    }

    /// Every byte value once (8 bits entropy).
    fn data_uniform() -> Vec<u8> {
        (0..=255u8).collect()
    }

    /// 90% one byte, 10% another.
    fn data_skewed(n: usize) -> Vec<u8> {
        (0..n).map(|i| if i % 10 == 0 { 1 } else { 0 }).collect()
    }

    fn data_repeating_text() -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog. ".repeat(100)
    }

    fn data_sawtooth(n: usize) -> Vec<u8> {
        (0..n).map(|i| (i % 256) as u8).collect()
    }

    /// Long runs of decreasing length.
    fn data_runs() -> Vec<u8> {
        let mut v = Vec::new();
        for i in 0..50u8 {
            for _ in 0..(256 - i as usize * 4).max(1) {
                v.push(i);
            }
        }
        v
    }

    fn table_for(input: &[u8]) -> CodeTable {
        let freq = frequency::get_frequency(input);
        let mut tree = HuffmanTree::new(&freq);
        let mut table = CodeTable::new();
        tree.generate_dict(&mut table).unwrap();
        table
    }

    fn assert_prefix_free(table: &CodeTable) {
        let codes: Vec<_> = table.iter().filter(|(_, e)| e.length > 0).collect();
        for (i, &(sa, a)) in codes.iter().enumerate() {
            for &(sb, b) in &codes[i + 1..] {
                let (short, long) = if a.length <= b.length { (a, b) } else { (b, a) };
                let prefix = long.code >> (long.length - short.length);
                assert_ne!(
                    prefix, short.code,
                    "code of {:#04x} is a prefix of {:#04x}",
                    sa, sb
                );
            }
        }
    }

    // ---------------------------------------------------------------
    // 1. Pipeline equivalence on fixed vectors
    // ---------------------------------------------------------------

    macro_rules! equivalence_test {
        ($name:ident, $data:expr) => {
            #[test]
            fn $name() {
                let input: Vec<u8> = $data;
                let expected = pipeline::compress(&input).unwrap();
                assert_eq!(expected.bytes.len() as u64, expected.bit_len.div_ceil(8));
                for workers in [1, 2, 3, 4, 7, 8] {
                    let actual = pipeline::compress_parallel(&input, workers).unwrap();
                    assert_eq!(actual, expected, "workers = {}", workers);
                }
            }
        };
    }

    equivalence_test!(equiv_all_zeros, data_all_zeros(1000));
    equivalence_test!(equiv_uniform, data_uniform());
    equivalence_test!(equiv_skewed, data_skewed(5000));
    equivalence_test!(equiv_repeating_text, data_repeating_text());
    equivalence_test!(equiv_sawtooth, data_sawtooth(3001));
    equivalence_test!(equiv_runs, data_runs());
    equivalence_test!(equiv_single_byte, vec![42]);
    equivalence_test!(equiv_two_bytes, vec![1, 2]);

    // ---------------------------------------------------------------
    // 2. Code properties
    // ---------------------------------------------------------------

    #[test]
    fn uniform_input_gets_eight_bit_codes() {
        let table = table_for(&data_uniform());
        assert!(table.iter().all(|(_, e)| e.length == 8));
        assert_prefix_free(&table);
    }

    #[test]
    fn kraft_equality_holds() {
        for input in [data_repeating_text(), data_runs(), data_skewed(999)] {
            let table = table_for(&input);
            let kraft: f64 = table
                .iter()
                .filter(|(_, e)| e.length > 0)
                .map(|(_, e)| 0.5f64.powi(e.length as i32))
                .sum();
            assert!((kraft - 1.0).abs() < 1e-9, "kraft sum {}", kraft);
            assert_prefix_free(&table);
        }
    }

    #[test]
    fn encoded_size_within_one_bit_of_entropy() {
        let input = data_repeating_text();
        let freq = frequency::get_frequency(&input);
        let table = table_for(&input);
        let bits_per_symbol = freq.encoded_bits(&table) as f64 / freq.total as f64;
        let entropy = freq.entropy();
        assert!(bits_per_symbol >= entropy - 1e-9);
        assert!(bits_per_symbol < entropy + 1.0);
    }

    #[test]
    fn skewed_input_compresses_to_about_one_bit_per_byte() {
        let input = data_skewed(8000);
        let result = pipeline::compress(&input).unwrap();
        assert_eq!(result.bit_len, 8000);
        assert_eq!(result.bytes.len(), 1000);
    }

    // ---------------------------------------------------------------
    // 3. Property tests
    // ---------------------------------------------------------------

    proptest! {
        #[test]
        fn parallel_matches_sequential(
            input in proptest::collection::vec(any::<u8>(), 0..2048),
            workers in 1usize..9,
        ) {
            let expected = pipeline::compress(&input).unwrap();
            let actual = pipeline::compress_parallel(&input, workers).unwrap();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn parallel_matches_sequential_small_alphabet(
            input in proptest::collection::vec(0u8..4, 0..4096),
            workers in 1usize..9,
        ) {
            let expected = pipeline::compress(&input).unwrap();
            let actual = pipeline::compress_parallel(&input, workers).unwrap();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn split_counts_merge_to_whole(
            input in proptest::collection::vec(any::<u8>(), 0..1024),
            split in 0usize..1024,
        ) {
            let split = split.min(input.len());
            let mut merged = FrequencyTable::new();
            let mut left = FrequencyTable::new();
            left.count(&input[..split]);
            let mut right = FrequencyTable::new();
            right.count(&input[split..]);
            merged.merge(&left);
            merged.merge(&right);
            prop_assert_eq!(merged, frequency::get_frequency(&input));
        }

        #[test]
        fn partitions_tile_the_input(len in 0usize..5000, workers in 1usize..33) {
            let parts = partition(len, workers);
            prop_assert!(parts.len() <= workers);
            let mut next = 0;
            for range in &parts {
                prop_assert_eq!(range.start, next);
                prop_assert!(range.end > range.start);
                next = range.end;
            }
            prop_assert_eq!(next, len);
        }

        #[test]
        fn bit_length_equals_weighted_code_lengths(
            input in proptest::collection::vec(any::<u8>(), 1..2048),
        ) {
            let freq = frequency::get_frequency(&input);
            let table = table_for(&input);
            let result = pipeline::compress(&input).unwrap();
            prop_assert_eq!(result.bit_len, freq.encoded_bits(&table));
            prop_assert_eq!(result.bytes.len() as u64, result.bit_len.div_ceil(8));
        }
    }
}
