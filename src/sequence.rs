//! Encoding raw nucleotides into 2-bit codes.

use bytes::Bytes;

use crate::error::InvalidBaseError;

/// Sentinel for masked values that no valid base produces.
const INVALID: u8 = u8::MAX;

/// Base code indexed by the low three bits of the ASCII byte.
///
/// `A`/`a` = 1, `C`/`c` = 3, `G`/`g` = 7 and `T`/`t` = 4 after masking, so the
/// low three bits tell the four bases apart regardless of case.
const CODES: [u8; 8] = [INVALID, 0, INVALID, 1, 3, INVALID, INVALID, 2];

/// Maps one nucleotide byte to its code without validation.
///
/// Bytes outside `ACGTacgt` either collide with a real base or produce the
/// sentinel `u8::MAX`; use [`Encoder::encode`] for checked input.
#[inline]
pub const fn code_of(byte: u8) -> u8 {
    CODES[(byte & 0b111) as usize]
}

#[inline]
const fn is_nucleotide(byte: u8) -> bool {
    matches!(
        byte,
        b'A' | b'C' | b'G' | b'T' | b'a' | b'c' | b'g' | b't'
    )
}

/// An immutable run of base codes (`0 = A`, `1 = C`, `2 = G`, `3 = T`).
///
/// Backed by [`Bytes`], so clones are cheap reference-count bumps and every
/// shard can hold its own handle on the same buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedSequence(Bytes);

impl EncodedSequence {
    /// The codes as a slice.
    pub fn codes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bases.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no bases were encoded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Converts raw nucleotide bytes into an [`EncodedSequence`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder;

impl Encoder {
    /// Encodes `bytes`, rejecting anything outside `ACGTacgt`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBaseError`] carrying the first offending byte and its
    /// position.
    ///
    /// # Examples
    ///
    /// ```
    /// use knucleotide::sequence::Encoder;
    ///
    /// let seq = Encoder::encode(b"GgTa").unwrap();
    /// assert_eq!(seq.codes(), &[2, 2, 3, 0]);
    /// assert!(Encoder::encode(b"GGNT").is_err());
    /// ```
    pub fn encode(bytes: &[u8]) -> Result<EncodedSequence, InvalidBaseError> {
        if let Some(position) = bytes.iter().position(|&b| !is_nucleotide(b)) {
            return Err(InvalidBaseError {
                base: bytes[position],
                position,
            });
        }

        Ok(EncodedSequence(
            bytes.iter().map(|&b| code_of(b)).collect::<Vec<u8>>().into(),
        ))
    }

    /// Encodes a string slice; see [`Encoder::encode`].
    pub fn encode_str(s: &str) -> Result<EncodedSequence, InvalidBaseError> {
        Self::encode(s.as_bytes())
    }
}
