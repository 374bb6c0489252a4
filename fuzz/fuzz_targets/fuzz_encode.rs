//! Fuzz target for the encoder.
//!
//! Every accepted input must map to codes in `0..4`, and every rejected input
//! must point at a byte outside `ACGTacgt`.

#![no_main]

use knucleotide::sequence::Encoder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    match Encoder::encode(data) {
        Ok(seq) => {
            assert_eq!(seq.len(), data.len());
            assert!(seq.codes().iter().all(|&c| c < 4));
        }
        Err(err) => {
            assert!(!b"ACGTacgt".contains(&err.base));
            assert_eq!(data[err.position], err.base);
            assert!(data[..err.position]
                .iter()
                .all(|b| b"ACGTacgt".contains(b)));
        }
    }
});
