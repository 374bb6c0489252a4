//! Turning tables and fragment counts into output.
//!
//! The text layout is one frequency block per reported length, each block a
//! descending list of `"<k-mer> <percent>"` lines followed by a blank line,
//! then one `"<count>\t<fragment>"` line per queried fragment.

use std::{fmt::Write as _, io::Write};

use serde::Serialize;

use crate::{
    cli::OutputFormat,
    error::KNucError,
    kmer::{unpack_to_string, KmerLength},
    query::FragmentCount,
    table::FrequencyTable,
};

/// One line of a frequency report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    pub kmer: String,
    pub count: u64,
    /// Share of all windows, already rounded to three decimals.
    pub percent: f64,
}

/// Entries of `table` with percentages over `total`, most frequent first.
///
/// Equal counts are ordered by k-mer so the listing is deterministic.
pub fn frequency_entries(total: u64, table: &FrequencyTable) -> Vec<FrequencyEntry> {
    let k = table.k();
    let mut entries: Vec<FrequencyEntry> = table
        .iter()
        .map(|(bits, count)| FrequencyEntry {
            kmer: unpack_to_string(bits, k),
            count,
            percent: percentage(count, total),
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.kmer.cmp(&b.kmer)));
    entries
}

/// `count / total` as a percentage, rounded half up to three decimals.
///
/// Rounding happens on the exact ratio in integers, so a tie such as
/// `1 / 1600 = 0.0625%` becomes `0.063` rather than the float formatter's
/// round-half-even `0.062`.
fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = u128::from(total);
    let thousandths = (u128::from(count) * 200_000 + total) / (2 * total);
    thousandths as f64 / 1000.0
}

/// Renders `table` as `"<k-mer> <percent>"` lines plus a trailing blank line.
///
/// # Examples
///
/// ```
/// use knucleotide::{report::write_frequencies, sequence::Encoder, shard::count_all};
///
/// let seq = Encoder::encode(b"AAAC")?;
/// let tables = count_all(&seq, &[1], Some(1))?;
/// assert_eq!(write_frequencies(4, &tables[0]), "A 75.000\nC 25.000\n\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_frequencies(total: u64, table: &FrequencyTable) -> String {
    render_entries(&frequency_entries(total, table))
}

fn render_entries(entries: &[FrequencyEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{} {:.3}", entry.kmer, entry.percent);
    }
    out.push('\n');
    out
}

/// The full frequency listing for one k-mer length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyReport {
    pub k: usize,
    pub total: u64,
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyReport {
    /// Builds the report for a merged `table` over `total` windows.
    pub fn new(total: u64, table: &FrequencyTable) -> Self {
        Self {
            k: table.k().get(),
            total,
            entries: frequency_entries(total, table),
        }
    }
}

/// Number of `k`-windows in a sequence of `len` bases.
///
/// This is the percentage denominator: the sequence length for single bases,
/// one less for pairs, and so on.
pub const fn window_count(len: usize, k: KmerLength) -> u64 {
    len.saturating_sub(k.get() - 1) as u64
}

/// Everything a run prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub frequencies: Vec<FrequencyReport>,
    pub fragments: Vec<FragmentCount>,
}

impl Report {
    /// Renders the plain-text layout.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for report in &self.frequencies {
            out.push_str(&render_entries(&report.entries));
        }
        for fragment in &self.fragments {
            let _ = writeln!(out, "{fragment}");
        }
        out
    }

    /// Writes the report to `writer` in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`KNucError::WriteError`] or [`KNucError::JsonError`].
    pub fn write_to<W: Write>(&self, mut writer: W, format: OutputFormat) -> Result<(), KNucError> {
        match format {
            OutputFormat::Text => writer.write_all(self.to_text().as_bytes())?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, self)?;
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}
