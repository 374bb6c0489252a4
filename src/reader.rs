//! Locating one named record in FASTA input.

use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use bio::io::fasta;

use crate::{
    error::KNucError,
    sequence::{EncodedSequence, Encoder},
};

#[cfg(feature = "tracing")]
use tracing::{debug, info_span};

/// Check if a path has a gzip extension (.gz).
#[cfg(feature = "gzip")]
fn is_gzip_path<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().extension().is_some_and(|ext| ext == "gz")
}

/// Returns the raw sequence of the first record whose identifier is `id`.
///
/// The identifier is the first word of the header line, so `>THREE Homo
/// sapiens frequency` matches `THREE`. Sequence lines are concatenated with
/// their line terminators removed.
///
/// # Errors
///
/// - [`KNucError::SequenceParse`] if the input is not valid FASTA
/// - [`KNucError::RecordNotFound`] if no record carries `id`
/// - [`KNucError::EmptyRecord`] if the record has no sequence lines
pub fn read_record_from<R: Read>(reader: R, id: &str) -> Result<Vec<u8>, KNucError> {
    #[cfg(feature = "tracing")]
    let _span = info_span!("read_record", id).entered();

    for record in fasta::Reader::new(reader).records() {
        let record = record.map_err(|e| KNucError::SequenceParse {
            details: e.to_string(),
        })?;
        if record.id() != id {
            continue;
        }
        if record.seq().is_empty() {
            return Err(KNucError::EmptyRecord { id: id.to_string() });
        }

        #[cfg(feature = "tracing")]
        debug!(bases = record.seq().len(), "Found record");

        return Ok(record.seq().to_vec());
    }

    Err(KNucError::RecordNotFound { id: id.to_string() })
}

/// Opens `path` (decompressing `.gz` files with the `gzip` feature) and reads
/// the record `id` from it.
///
/// # Errors
///
/// Returns [`KNucError::SequenceRead`] if the file cannot be opened, otherwise
/// the errors of [`read_record_from`].
pub fn read_record<P: AsRef<Path>>(path: P, id: &str) -> Result<Vec<u8>, KNucError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| KNucError::SequenceRead {
        source,
        path: path.to_path_buf(),
    })?;

    #[cfg(feature = "gzip")]
    {
        if is_gzip_path(path) {
            return read_record_from(flate2::read::GzDecoder::new(file), id);
        }
    }

    read_record_from(file, id)
}

/// Reads record `id` from `path`, or from stdin when `path` is `None`, and
/// encodes it.
///
/// # Errors
///
/// Propagates read errors and rejects sequences containing non-`ACGT` bases.
pub fn read_sequence(path: Option<&Path>, id: &str) -> Result<EncodedSequence, KNucError> {
    let raw = match path {
        Some(path) => read_record(path, id)?,
        None => read_record_from(io::stdin().lock(), id)?,
    };
    Ok(Encoder::encode(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = ">ONE Homo sapiens alu\nGGCCGGGCGC\n>TWO IUB ambiguity codes\ncttBtatcatatgcta\n>THREE Homo sapiens frequency\naacacttcac\ncagcggaag\n";

    #[test]
    fn finds_record_by_identifier() {
        let raw = read_record_from(INPUT.as_bytes(), "THREE").unwrap();
        assert_eq!(raw, b"aacacttcaccagcggaag");
    }

    #[test]
    fn stops_at_next_header() {
        let raw = read_record_from(INPUT.as_bytes(), "ONE").unwrap();
        assert_eq!(raw, b"GGCCGGGCGC");
    }

    #[test]
    fn missing_record_is_an_error() {
        let err = read_record_from(INPUT.as_bytes(), "FOUR").unwrap_err();
        assert!(matches!(err, KNucError::RecordNotFound { ref id } if id == "FOUR"));
    }

    #[test]
    fn record_without_sequence_is_an_error() {
        let err = read_record_from(">THREE\n>FOUR\nACGT\n".as_bytes(), "THREE").unwrap_err();
        assert!(matches!(err, KNucError::EmptyRecord { .. }));
    }

    #[test]
    fn text_before_first_header_is_rejected() {
        let err = read_record_from("; comment\n>THREE\nACGT\n".as_bytes(), "THREE").unwrap_err();
        assert!(matches!(err, KNucError::SequenceParse { .. }));
    }

    #[test]
    fn crlf_line_endings_are_stripped() {
        let raw = read_record_from(">THREE\r\nACGT\r\nTTGA\r\n".as_bytes(), "THREE").unwrap();
        assert_eq!(raw, b"ACGTTTGA");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_record("does/not/exist.fa", "THREE").unwrap_err();
        assert!(matches!(err, KNucError::SequenceRead { .. }));
        assert!(err.to_string().contains("does/not/exist.fa"));
    }

    #[test]
    fn ambiguous_bases_fail_encoding() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), ">THREE\nACGTNACGT\n").unwrap();
        let err = read_sequence(Some(file.path()), "THREE").unwrap_err();
        assert!(matches!(
            err,
            KNucError::InvalidBase {
                base: b'N',
                position: 4
            }
        ));
    }
}
