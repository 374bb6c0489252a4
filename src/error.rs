//! Error types for knucleotide.
//!
//! This module provides exhaustive, strongly-typed errors for all operations
//! in the library, enabling precise error handling and informative messages.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in knucleotide operations.
#[derive(Debug, Error)]
pub enum KNucError {
    /// K-mer length is outside the valid range (1-31).
    #[error("invalid k-mer length {k}: must be between {min} and {max}")]
    InvalidKmerLength { k: usize, min: u8, max: u8 },

    /// Encountered an invalid DNA base.
    #[error("invalid base '{}' at position {position}", base_char(.base))]
    InvalidBase { base: u8, position: usize },

    /// No record with the requested identifier exists in the input.
    #[error("no record with identifier '{id}' found in input")]
    RecordNotFound { id: String },

    /// The requested record has a header but no sequence lines.
    #[error("record '{id}' contains no sequence data")]
    EmptyRecord { id: String },

    /// Failed to read sequence file.
    #[error("failed to read sequence file '{path}': {source}")]
    SequenceRead {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to parse sequence record.
    #[error("failed to parse sequence record: {details}")]
    SequenceParse { details: String },

    /// Two frequency tables built for different k-mer lengths were merged.
    #[error("cannot merge a {left}-mer table with a {right}-mer table")]
    LengthMismatch { left: usize, right: usize },

    /// A frequency report was requested for a length no shard counts.
    #[error("no shards are scheduled for k-mer length {k}")]
    UnscheduledLength { k: usize },

    /// A fragment could not be used as a query.
    #[error("invalid fragment '{fragment}': {details}")]
    InvalidFragment { fragment: String, details: String },

    /// A counting shard did not deliver its table.
    #[error("shard (k = {k}, offset = {offset}) failed: {details}")]
    ShardFailed {
        k: usize,
        offset: usize,
        details: String,
    },

    /// The worker pool could not be started.
    #[error("failed to build worker pool: {details}")]
    ThreadPool { details: String },

    /// Failed to write output.
    #[error("failed to write output: {source}")]
    WriteError {
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON: {source}")]
    JsonError {
        #[source]
        source: serde_json::Error,
    },
}

fn base_char(base: &u8) -> char {
    char::from(*base)
}

/// Error for invalid k-mer length.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("k-mer length {k} is out of range: must be between {min} and {max}")]
pub struct KmerLengthError {
    /// The invalid k value that was provided.
    pub k: usize,
    /// Minimum valid k-mer length.
    pub min: u8,
    /// Maximum valid k-mer length.
    pub max: u8,
}

/// Error for invalid DNA base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBaseError {
    /// The invalid byte value.
    pub base: u8,
    /// Position of the invalid byte in the sequence.
    pub position: usize,
}

impl std::fmt::Display for InvalidBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.base.is_ascii_graphic() || self.base == b' ' {
            write!(
                f,
                "invalid base '{}' (0x{:02x}) at position {}",
                self.base as char, self.base, self.position
            )
        } else {
            write!(
                f,
                "invalid base 0x{:02x} at position {}",
                self.base, self.position
            )
        }
    }
}

impl std::error::Error for InvalidBaseError {}

impl From<std::io::Error> for KNucError {
    fn from(source: std::io::Error) -> Self {
        Self::WriteError { source }
    }
}

impl From<serde_json::Error> for KNucError {
    fn from(source: serde_json::Error) -> Self {
        Self::JsonError { source }
    }
}

impl From<KmerLengthError> for KNucError {
    fn from(err: KmerLengthError) -> Self {
        Self::InvalidKmerLength {
            k: err.k,
            min: err.min,
            max: err.max,
        }
    }
}

impl From<InvalidBaseError> for KNucError {
    fn from(err: InvalidBaseError) -> Self {
        Self::InvalidBase {
            base: err.base,
            position: err.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kmer_length_error_display() {
        let err = KmerLengthError {
            k: 40,
            min: 1,
            max: 31,
        };
        assert_eq!(
            err.to_string(),
            "k-mer length 40 is out of range: must be between 1 and 31"
        );
    }

    #[test]
    fn invalid_base_error_display() {
        let err = InvalidBaseError {
            base: b'N',
            position: 5,
        };
        assert_eq!(err.to_string(), "invalid base 'N' (0x4e) at position 5");

        let err = InvalidBaseError {
            base: 0x07,
            position: 0,
        };
        assert_eq!(err.to_string(), "invalid base 0x07 at position 0");
    }

    #[test]
    fn knuc_error_from_kmer_length_error() {
        let err: KNucError = KmerLengthError {
            k: 0,
            min: 1,
            max: 31,
        }
        .into();
        assert!(matches!(err, KNucError::InvalidKmerLength { k: 0, .. }));
    }

    #[test]
    fn knuc_error_from_invalid_base_error() {
        let err: KNucError = InvalidBaseError {
            base: b'X',
            position: 3,
        }
        .into();
        assert!(matches!(
            err,
            KNucError::InvalidBase {
                base: b'X',
                position: 3
            }
        ));
        assert_eq!(err.to_string(), "invalid base 'X' at position 3");
    }

    #[test]
    fn shard_failure_display() {
        let err = KNucError::ShardFailed {
            k: 12,
            offset: 7,
            details: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "shard (k = 12, offset = 7) failed: boom");
    }
}
