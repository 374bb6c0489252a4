//! Run configuration.

use std::path::PathBuf;

use crate::{
    cli::{Args, OutputFormat},
    error::KNucError,
    kmer::KmerLength,
    query::fragment_key,
};

/// K-mer lengths counted by default.
pub const DEFAULT_LENGTHS: [usize; 7] = [1, 2, 3, 4, 6, 12, 18];

/// Lengths that get a full frequency report by default.
pub const DEFAULT_REPORT_LENGTHS: [usize; 2] = [1, 2];

/// Fragments counted exactly by default.
pub const DEFAULT_FRAGMENTS: [&str; 5] = [
    "GGT",
    "GGTA",
    "GGTATT",
    "GGTATTTTAATT",
    "GGTATTTTAATTTATAGT",
];

/// Identifier of the record analysed by default.
pub const DEFAULT_RECORD_ID: &str = "THREE";

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Input file; stdin when `None`.
    pub path: Option<PathBuf>,
    pub record_id: String,
    pub lengths: Vec<usize>,
    pub report_lengths: Vec<usize>,
    pub fragments: Vec<String>,
    /// Worker pool size; one per core when `None`.
    pub threads: Option<usize>,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            record_id: DEFAULT_RECORD_ID.to_string(),
            lengths: DEFAULT_LENGTHS.to_vec(),
            report_lengths: DEFAULT_REPORT_LENGTHS.to_vec(),
            fragments: DEFAULT_FRAGMENTS.map(String::from).to_vec(),
            threads: None,
            format: OutputFormat::Text,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            path: args.path,
            record_id: args.record,
            lengths: args.lengths,
            report_lengths: args.report_lengths,
            fragments: args.fragments,
            threads: args.threads,
            format: args.format,
        }
    }
}

impl Config {
    /// Checks the configuration before any input is read.
    ///
    /// # Errors
    ///
    /// - [`KNucError::InvalidKmerLength`] for a length outside `1..=31`
    /// - [`KNucError::UnscheduledLength`] for a report length that is not counted
    /// - [`KNucError::InvalidFragment`] for an unusable fragment
    pub fn validate(&self) -> Result<(), KNucError> {
        for &k in &self.lengths {
            KmerLength::new(k)?;
        }
        for &k in &self.report_lengths {
            KmerLength::new(k)?;
            if !self.lengths.contains(&k) {
                return Err(KNucError::UnscheduledLength { k });
            }
        }
        for fragment in &self.fragments {
            fragment_key(fragment)?;
        }
        Ok(())
    }
}
