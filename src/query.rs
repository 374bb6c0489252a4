//! Exact occurrence counts for literal fragments.

use serde::Serialize;

use crate::{
    error::KNucError,
    kmer::{KmerLength, PackedKmer},
    sequence::Encoder,
    table::FrequencyTable,
};

/// How often one fragment occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentCount {
    pub fragment: String,
    pub count: u64,
}

impl std::fmt::Display for FragmentCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.count, self.fragment)
    }
}

/// Packs `fragment` into a key of its own length.
///
/// # Errors
///
/// Returns [`KNucError::InvalidFragment`] for empty fragments, fragments
/// longer than 31 bases, or fragments containing anything but `ACGTacgt`.
pub fn fragment_key(fragment: &str) -> Result<PackedKmer, KNucError> {
    let invalid = |details: String| KNucError::InvalidFragment {
        fragment: fragment.to_string(),
        details,
    };

    let k = KmerLength::new(fragment.len()).map_err(|e| invalid(e.to_string()))?;
    let codes = Encoder::encode_str(fragment).map_err(|e| invalid(e.to_string()))?;
    Ok(PackedKmer::pack(codes.codes(), 0, k))
}

/// Sums the count of `fragment` over every table of matching length.
///
/// A fragment whose length has no tables counts `0`.
///
/// # Errors
///
/// See [`fragment_key`].
///
/// # Examples
///
/// ```
/// use knucleotide::{query::count_fragment, sequence::Encoder, shard::count_all};
///
/// let seq = Encoder::encode(b"GGTAGGTA")?;
/// let tables = count_all(&seq, &[3], Some(1))?;
/// assert_eq!(count_fragment(&tables, "GGT")?, 2);
/// assert_eq!(count_fragment(&tables, "GGTA")?, 0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn count_fragment<'a, I>(tables: I, fragment: &str) -> Result<u64, KNucError>
where
    I: IntoIterator<Item = &'a FrequencyTable>,
{
    let key = fragment_key(fragment)?;
    Ok(tables.into_iter().map(|table| table.count_of(key)).sum())
}

/// Counts each of `fragments`, preserving their order.
///
/// # Errors
///
/// Fails on the first invalid fragment.
pub fn count_fragments<S: AsRef<str>>(
    tables: &[FrequencyTable],
    fragments: &[S],
) -> Result<Vec<FragmentCount>, KNucError> {
    fragments
        .iter()
        .map(|fragment| {
            let fragment = fragment.as_ref();
            Ok(FragmentCount {
                fragment: fragment.to_string(),
                count: count_fragment(tables, fragment)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shard::count_all;

    #[test]
    fn fragment_key_packs_its_own_length() {
        let key = fragment_key("GGT").unwrap();
        assert_eq!(key.k().get(), 3);
        assert_eq!(key.packed_bits(), 0b10_10_11);
    }

    #[test]
    fn fragment_key_is_case_insensitive() {
        assert_eq!(fragment_key("ggt").unwrap(), fragment_key("GGT").unwrap());
    }

    #[test]
    fn invalid_fragments_are_rejected() {
        assert!(matches!(
            fragment_key(""),
            Err(KNucError::InvalidFragment { .. })
        ));
        assert!(matches!(
            fragment_key("GGNT"),
            Err(KNucError::InvalidFragment { .. })
        ));
        assert!(matches!(
            fragment_key(&"A".repeat(32)),
            Err(KNucError::InvalidFragment { .. })
        ));
    }

    #[test]
    fn unscheduled_length_counts_zero() {
        let seq = Encoder::encode(b"GGTGGTGGT").unwrap();
        let tables = count_all(&seq, &[3], Some(1)).unwrap();
        assert_eq!(count_fragment(&tables, "GGTG").unwrap(), 0);
    }

    #[test]
    fn overlapping_occurrences_are_found_across_shards() {
        // AAAA has AAA at 0 and 1, which land in different shards.
        let seq = Encoder::encode(b"AAAA").unwrap();
        let tables = count_all(&seq, &[3], Some(2)).unwrap();
        assert_eq!(count_fragment(&tables, "AAA").unwrap(), 2);
    }

    #[test]
    fn count_fragments_keeps_request_order() {
        let seq = Encoder::encode(b"GGTATTGGTA").unwrap();
        let tables = count_all(&seq, &[3, 4], Some(2)).unwrap();
        let counts = count_fragments(&tables, &["GGTA", "GGT"]).unwrap();
        assert_eq!(
            counts,
            vec![
                FragmentCount {
                    fragment: "GGTA".to_string(),
                    count: 2
                },
                FragmentCount {
                    fragment: "GGT".to_string(),
                    count: 2
                },
            ]
        );
        assert_eq!(counts[1].to_string(), "2\tGGT");
    }
}
