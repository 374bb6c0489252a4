//! # knucleotide
//!
//! Sharded, parallel k-nucleotide counting for a single FASTA record.
//!
//! The record is encoded into 2-bit base codes once. For every requested
//! k-mer length `k`, `k` independent shards count the windows starting at
//! `offset, offset + k, offset + 2k, ...` for each `offset` in `0..k` into
//! their own [`table::FrequencyTable`]. Shards of one length are merged for
//! frequency reports, and literal fragments are counted by summing their
//! packed key over every shard of matching length.
//!
//! ## Quick start
//!
//! ```rust
//! use knucleotide::{
//!     kmer::KmerLength,
//!     query::count_fragment,
//!     report::{window_count, write_frequencies},
//!     sequence::Encoder,
//!     shard::count_all,
//!     table::merge_length,
//! };
//!
//! let seq = Encoder::encode(b"GGTATTTTAATTTATAGT")?;
//! let tables = count_all(&seq, &[1, 2, 3], None)?;
//!
//! let k = KmerLength::new(1)?;
//! let singles = write_frequencies(window_count(seq.len(), k), &merge_length(&tables, k));
//! assert!(singles.starts_with("T 55.556\n"));
//!
//! assert_eq!(count_fragment(&tables, "GGT")?, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `gzip`: read `.gz` compressed input
//! - `tracing`: emit `tracing` spans and events while counting

pub mod cli;
pub mod config;
pub mod error;
pub mod kmer;
pub mod query;
pub mod reader;
pub mod report;
pub mod run;
pub mod sequence;
pub mod shard;
pub mod table;
