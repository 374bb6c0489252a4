//! Command-line interface definition.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{DEFAULT_FRAGMENTS, DEFAULT_LENGTHS, DEFAULT_RECORD_ID, DEFAULT_REPORT_LENGTHS};

/// Sharded k-nucleotide frequencies and fragment counts for one FASTA record.
#[derive(Parser, Debug)]
#[command(name = "knucleotide")]
#[command(version, author, about, long_about = None)]
pub struct Args {
    /// Path to a FASTA file (reads stdin when omitted)
    pub path: Option<PathBuf>,

    /// Identifier of the record to analyse
    #[arg(short, long, default_value = DEFAULT_RECORD_ID)]
    pub record: String,

    /// K-mer lengths to count, comma separated (1-31)
    #[arg(
        short = 'k',
        long,
        value_delimiter = ',',
        value_parser = parse_k,
        default_values_t = DEFAULT_LENGTHS
    )]
    pub lengths: Vec<usize>,

    /// Lengths that get a full frequency table in the output
    #[arg(
        long = "report",
        value_delimiter = ',',
        value_parser = parse_k,
        default_values_t = DEFAULT_REPORT_LENGTHS
    )]
    pub report_lengths: Vec<usize>,

    /// Fragments whose exact counts are printed, comma separated
    #[arg(
        long = "fragments",
        value_delimiter = ',',
        default_values_t = DEFAULT_FRAGMENTS.map(String::from)
    )]
    pub fragments: Vec<String>,

    /// Worker threads (defaults to one per core)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Suppress informational output on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Frequency tables followed by `count<TAB>fragment` lines
    #[default]
    Text,
    /// JSON object with `frequencies` and `fragments`
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

fn parse_k(s: &str) -> Result<usize, String> {
    let k: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if k == 0 {
        return Err("k-mer length must be at least 1".to_string());
    }
    if k > 31 {
        return Err("k-mer length must be at most 31".to_string());
    }
    Ok(k)
}
