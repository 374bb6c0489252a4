//! Counting a record end to end.
//!
//! Reads the configured record, shards the counting work for every configured
//! length, then builds the frequency reports and fragment counts once every
//! shard has finished.

use std::{
    io::{stdout, BufWriter},
    time::{Duration, Instant},
};

use crate::{
    config::Config,
    error::KNucError,
    kmer::KmerLength,
    query::count_fragments,
    reader::read_sequence,
    report::{window_count, FrequencyReport, Report},
    sequence::EncodedSequence,
    shard::ShardScheduler,
    table::merge_length,
};

#[cfg(feature = "tracing")]
use tracing::{info, info_span};

/// Figures about a finished run, for informational output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Bases in the analysed record.
    pub bases: usize,
    /// Shards that were counted.
    pub shards: usize,
    /// Time spent counting and reporting, excluding input.
    pub elapsed: Duration,
}

/// Counts `sequence` as described by `config` and assembles the report.
///
/// # Errors
///
/// Returns a configuration error for invalid lengths or fragments, and
/// [`KNucError::ShardFailed`] if any shard did not complete.
pub fn analyze(sequence: &EncodedSequence, config: &Config) -> Result<Report, KNucError> {
    config.validate()?;
    analyze_validated(sequence, config).map(|(report, _)| report)
}

/// Counts and reports with a config that has already passed
/// [`Config::validate`].
fn analyze_validated(
    sequence: &EncodedSequence,
    config: &Config,
) -> Result<(Report, usize), KNucError> {
    #[cfg(feature = "tracing")]
    let _span = info_span!("analyze", bases = sequence.len()).entered();

    let scheduler = ShardScheduler::new(config.threads)?;
    let shards = scheduler.schedule(sequence, &config.lengths)?;
    let shard_count = shards.len();
    let tables = shards.join_all()?;

    let frequencies = config
        .report_lengths
        .iter()
        .map(|&k| -> Result<FrequencyReport, KNucError> {
            let k = KmerLength::new(k)?;
            let merged = merge_length(&tables, k);
            Ok(FrequencyReport::new(window_count(sequence.len(), k), &merged))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let fragments = count_fragments(&tables, config.fragments.as_slice())?;

    #[cfg(feature = "tracing")]
    info!(
        shards = shard_count,
        reports = frequencies.len(),
        fragments = fragments.len(),
        "Analysis complete"
    );

    Ok((
        Report {
            frequencies,
            fragments,
        },
        shard_count,
    ))
}

/// Reads the configured record, analyses it and writes the report to stdout.
///
/// # Errors
///
/// Returns [`KNucError`] on configuration, input, counting or output errors.
/// Nothing is written unless every shard succeeded.
pub fn run(config: &Config) -> Result<RunStats, KNucError> {
    config.validate()?;

    #[cfg(feature = "tracing")]
    info!(record = %config.record_id, path = ?config.path, "Starting k-nucleotide run");

    let sequence = read_sequence(config.path.as_deref(), &config.record_id)?;

    let start = Instant::now();
    let (report, shards) = analyze_validated(&sequence, config)?;
    report.write_to(BufWriter::new(stdout().lock()), config.format)?;

    Ok(RunStats {
        bases: sequence.len(),
        shards,
        elapsed: start.elapsed(),
    })
}
