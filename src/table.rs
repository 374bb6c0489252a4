//! Per-shard frequency tables and merging them.

use rustc_hash::FxHashMap;

use crate::{
    error::KNucError,
    kmer::{KmerLength, PackedKmer},
};

#[cfg(feature = "tracing")]
use tracing::debug;

/// Occurrence counts keyed by packed k-mer bits, for a single k-mer length.
///
/// A table is filled by exactly one shard and only read once that shard has
/// finished. Merging consumes the left-hand table and leaves the right-hand one
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    k: KmerLength,
    counts: FxHashMap<u64, u64>,
}

impl FrequencyTable {
    /// Creates an empty table for `k`-mers.
    pub fn new(k: KmerLength) -> Self {
        Self {
            k,
            counts: FxHashMap::default(),
        }
    }

    /// The k-mer length this table counts.
    pub const fn k(&self) -> KmerLength {
        self.k
    }

    /// Adds one occurrence of `bits`.
    #[inline]
    pub fn increment(&mut self, bits: u64) {
        self.add(bits, 1);
    }

    /// Adds `count` occurrences of `bits`.
    #[inline]
    pub fn add(&mut self, bits: u64, count: u64) {
        *self.counts.entry(bits).or_insert(0) += count;
    }

    /// Count stored under `bits`, `0` when absent.
    pub fn get(&self, bits: u64) -> u64 {
        self.counts.get(&bits).copied().unwrap_or(0)
    }

    /// Count of `kmer`, or `0` if it has a different length or never occurred.
    pub fn count_of(&self, kmer: PackedKmer) -> u64 {
        if kmer.k() == self.k {
            self.get(kmer.packed_bits())
        } else {
            0
        }
    }

    /// Number of distinct k-mers.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterates `(packed bits, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(&bits, &count)| (bits, count))
    }

    /// Folds `other` into `self` by summing counts key-wise.
    ///
    /// # Errors
    ///
    /// Returns [`KNucError::LengthMismatch`] if the tables count different
    /// k-mer lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// use knucleotide::{kmer::KmerLength, table::FrequencyTable};
    ///
    /// let k = KmerLength::new(2)?;
    /// let mut a = FrequencyTable::new(k);
    /// a.increment(5);
    /// let mut b = FrequencyTable::new(k);
    /// b.increment(5);
    /// b.increment(9);
    ///
    /// let merged = a.merge(&b)?;
    /// assert_eq!(merged.get(5), 2);
    /// assert_eq!(merged.get(9), 1);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn merge(mut self, other: &Self) -> Result<Self, KNucError> {
        if self.k != other.k {
            return Err(KNucError::LengthMismatch {
                left: self.k.get(),
                right: other.k.get(),
            });
        }
        self.counts.reserve(other.counts.len());
        for (bits, count) in other.iter() {
            self.add(bits, count);
        }
        Ok(self)
    }
}

/// Merges every table in `tables` that counts `k`-mers into one fresh table.
///
/// Tables of other lengths are skipped, so the full list of shard results can
/// be passed as is.
pub fn merge_length<'a, I>(tables: I, k: KmerLength) -> FrequencyTable
where
    I: IntoIterator<Item = &'a FrequencyTable>,
{
    let mut merged = FrequencyTable::new(k);
    for table in tables.into_iter().filter(|t| t.k == k) {
        for (bits, count) in table.iter() {
            merged.add(bits, count);
        }
    }

    #[cfg(feature = "tracing")]
    debug!(k = k.get(), distinct = merged.len(), "Merged shard tables");

    merged
}
