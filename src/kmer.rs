//! K-mer lengths and bit-packed k-mer keys.
//!
//! A k-mer of length `k` is packed into a `u64` by treating its base codes as
//! the digits of a base-4 number, most-significant digit first. The packed bits
//! alone are ambiguous (`A` and `AA` both pack to `0`), so a [`PackedKmer`]
//! always travels together with its [`KmerLength`].

use crate::error::KmerLengthError;

/// A validated k-mer length in the range `1..=31`.
///
/// 31 bases use 62 of the 64 available bits, which keeps every packed key
/// strictly below `4^31` and leaves the top two bits free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KmerLength(usize);

impl KmerLength {
    /// Smallest supported k-mer length.
    pub const MIN: u8 = 1;
    /// Largest supported k-mer length.
    pub const MAX: u8 = 31;

    /// Validates `k` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`KmerLengthError`] if `k` is zero or greater than 31.
    ///
    /// # Examples
    ///
    /// ```
    /// use knucleotide::kmer::KmerLength;
    ///
    /// assert!(KmerLength::new(18).is_ok());
    /// assert!(KmerLength::new(0).is_err());
    /// assert!(KmerLength::new(32).is_err());
    /// ```
    pub const fn new(k: usize) -> Result<Self, KmerLengthError> {
        if k < Self::MIN as usize || k > Self::MAX as usize {
            return Err(KmerLengthError {
                k,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(k))
    }

    /// Returns the length as a `usize`.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for KmerLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for KmerLength {
    type Error = KmerLengthError;

    fn try_from(k: usize) -> Result<Self, Self::Error> {
        Self::new(k)
    }
}

/// One nucleotide, as stored in an encoded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monomer {
    A,
    C,
    G,
    T,
}

impl Monomer {
    /// Decodes the low two bits of `bits`.
    pub const fn from_bits(bits: u64) -> Self {
        match bits & 0b11 {
            0 => Self::A,
            1 => Self::C,
            2 => Self::G,
            _ => Self::T,
        }
    }

    /// Upper-case ASCII letter of this base.
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
        }
    }
}

/// A k-mer packed into a `u64`, tagged with its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedKmer {
    bits: u64,
    k: KmerLength,
}

impl PackedKmer {
    /// Packs `k` codes of `codes` starting at `offset`.
    ///
    /// Each code must be in `0..4`; callers pass slices of an
    /// [`EncodedSequence`](crate::sequence::EncodedSequence) which upholds that.
    ///
    /// # Panics
    ///
    /// Panics if `offset + k` exceeds `codes.len()`.
    pub fn pack(codes: &[u8], offset: usize, k: KmerLength) -> Self {
        Self {
            bits: pack_bits(&codes[offset..offset + k.get()]),
            k,
        }
    }

    /// The packed key.
    pub const fn packed_bits(&self) -> u64 {
        self.bits
    }

    /// The k-mer length the key was packed at.
    pub const fn k(&self) -> KmerLength {
        self.k
    }

    /// Decodes the key back into nucleotide letters.
    pub fn unpack(&self) -> String {
        unpack_to_string(self.bits, self.k)
    }
}

impl std::fmt::Display for PackedKmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.unpack())
    }
}

/// Accumulates `key = key * 4 + code` over `codes`.
#[inline]
pub fn pack_bits(codes: &[u8]) -> u64 {
    codes
        .iter()
        .fold(0u64, |key, &code| (key << 2) | u64::from(code & 0b11))
}

/// Decodes `k` bases from `bits` into upper-case ASCII, first base first.
///
/// The low two bits hold the last base, so bases are peeled off the bottom and
/// written back to front.
pub fn unpack_to_bytes(bits: u64, k: KmerLength) -> Vec<u8> {
    let mut key = bits;
    let mut out = vec![0u8; k.get()];
    for slot in out.iter_mut().rev() {
        *slot = Monomer::from_bits(key).as_byte();
        key >>= 2;
    }
    out
}

/// Decodes `k` bases from `bits` into a `String`.
///
/// # Examples
///
/// ```
/// use knucleotide::kmer::{unpack_to_string, KmerLength};
///
/// let k = KmerLength::new(3).unwrap();
/// // G = 2, G = 2, T = 3 -> 0b10_10_11
/// assert_eq!(unpack_to_string(0b10_10_11, k), "GGT");
/// ```
pub fn unpack_to_string(bits: u64, k: KmerLength) -> String {
    unpack_to_bytes(bits, k).into_iter().map(char::from).collect()
}
