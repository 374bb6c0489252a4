//! Property-based tests using proptest.
//!
//! These tests verify invariants that should hold across all valid inputs,
//! catching edge cases that might be missed by example-based tests.

use knucleotide::kmer::{unpack_to_string, KmerLength, PackedKmer};
use knucleotide::query::count_fragment;
use knucleotide::report::{frequency_entries, window_count};
use knucleotide::sequence::Encoder;
use knucleotide::shard::{count_all, count_shard};
use knucleotide::table::{merge_length, FrequencyTable};
use proptest::prelude::*;

/// Strategy for generating valid DNA sequences.
fn dna_sequence(min_len: usize, max_len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![Just('A'), Just('C'), Just('G'), Just('T')],
        min_len..=max_len,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for small tables over 3-mers (keys below 4^3).
fn table3() -> impl Strategy<Value = FrequencyTable> {
    proptest::collection::vec((0u64..64, 1u64..50), 0..20).prop_map(|entries| {
        let mut table = FrequencyTable::new(KmerLength::new(3).unwrap());
        for (bits, count) in entries {
            table.add(bits, count);
        }
        table
    })
}

proptest! {
    /// Packing and unpacking a k-mer should be the identity operation.
    #[test]
    fn pack_unpack_roundtrip(seq in dna_sequence(1, 31)) {
        let k = KmerLength::new(seq.len()).unwrap();
        let codes = Encoder::encode_str(&seq).unwrap();
        let packed = PackedKmer::pack(codes.codes(), 0, k);

        prop_assert_eq!(unpack_to_string(packed.packed_bits(), k), seq);
    }

    /// Lower-case input packs to the same key as upper-case input.
    #[test]
    fn pack_ignores_case(seq in dna_sequence(1, 31)) {
        let k = KmerLength::new(seq.len()).unwrap();
        let upper = Encoder::encode_str(&seq).unwrap();
        let lower = Encoder::encode_str(&seq.to_lowercase()).unwrap();

        prop_assert_eq!(
            PackedKmer::pack(upper.codes(), 0, k),
            PackedKmer::pack(lower.codes(), 0, k)
        );
    }

    /// The shards of one length count every window exactly once in total.
    #[test]
    fn shard_counts_are_conserved(seq in dna_sequence(0, 200), k in 1usize..=12) {
        let encoded = Encoder::encode_str(&seq).unwrap();
        let k_len = KmerLength::new(k).unwrap();
        let per_offset: Vec<u64> = (0..k)
            .map(|offset| count_shard(&encoded, offset, k_len).total())
            .collect();

        for (offset, &total) in per_offset.iter().enumerate() {
            let expected = if seq.len() >= offset + k { (seq.len() - offset) / k } else { 0 };
            prop_assert_eq!(total as usize, expected, "offset {}", offset);
        }
        prop_assert_eq!(per_offset.iter().sum::<u64>(), window_count(seq.len(), k_len));
    }

    /// Counting a fragment agrees with a naive scan over overlapping windows.
    #[test]
    fn fragment_count_matches_naive_scan(
        seq in dna_sequence(0, 150),
        fragment in dna_sequence(1, 6),
    ) {
        let encoded = Encoder::encode_str(&seq).unwrap();
        let tables = count_all(&encoded, &[fragment.len()], Some(2)).unwrap();

        let naive = seq
            .as_bytes()
            .windows(fragment.len())
            .filter(|w| *w == fragment.as_bytes())
            .count() as u64;
        prop_assert_eq!(count_fragment(&tables, &fragment).unwrap(), naive);
    }

    /// Merging is associative and commutative.
    #[test]
    fn merge_is_associative_and_commutative(a in table3(), b in table3(), c in table3()) {
        let left = a.clone().merge(&b).unwrap().merge(&c).unwrap();
        let right = a.clone().merge(&b.clone().merge(&c).unwrap()).unwrap();
        let reversed = c.clone().merge(&b.clone().merge(&a).unwrap()).unwrap();

        prop_assert_eq!(&left, &right);
        prop_assert_eq!(&left, &reversed);
        prop_assert_eq!(left.total(), a.total() + b.total() + c.total());
    }

    /// Merging all shards gives the same table regardless of thread count.
    #[test]
    fn merged_table_is_independent_of_threads(seq in dna_sequence(0, 120), k in 1usize..=6) {
        let encoded = Encoder::encode_str(&seq).unwrap();
        let k_len = KmerLength::new(k).unwrap();
        let one = count_all(&encoded, &[k], Some(1)).unwrap();
        let four = count_all(&encoded, &[k], Some(4)).unwrap();

        prop_assert_eq!(merge_length(&one, k_len), merge_length(&four, k_len));
    }

    /// Report entries are sorted by non-increasing count with half-up rounded percentages.
    #[test]
    fn report_entries_descend(seq in dna_sequence(1, 150), k in 1usize..=3) {
        let encoded = Encoder::encode_str(&seq).unwrap();
        let k_len = KmerLength::new(k).unwrap();
        let tables = count_all(&encoded, &[k], Some(2)).unwrap();
        let merged = merge_length(&tables, k_len);
        let total = window_count(seq.len(), k_len);

        let entries = frequency_entries(total, &merged);
        prop_assert_eq!(entries.len(), merged.len());
        for pair in entries.windows(2) {
            prop_assert!(pair[0].count >= pair[1].count);
        }
        for entry in &entries {
            // thousandths of a percent, halves rounded up
            let scaled = entry.count * 100_000;
            let milli = scaled / total + u64::from(2 * (scaled % total) >= total);
            prop_assert_eq!(
                format!("{:.3}", entry.percent),
                format!("{}.{:03}", milli / 1000, milli % 1000)
            );
            prop_assert_eq!(entry.kmer.len(), k);
        }
    }
}
