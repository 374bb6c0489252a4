//! Fuzz target for pack/unpack roundtrip.
//!
//! Tests that packing and unpacking is the identity operation
//! for valid DNA sequences.

#![no_main]

use knucleotide::kmer::{unpack_to_bytes, KmerLength, PackedKmer};
use knucleotide::sequence::Encoder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let k = match KmerLength::new(data.len()) {
        Ok(k) => k,
        Err(_) => return,
    };

    // Only valid bases get this far; validation has its own target.
    let codes = match Encoder::encode(data) {
        Ok(codes) => codes,
        Err(_) => return,
    };

    let packed = PackedKmer::pack(codes.codes(), 0, k);
    let unpacked = unpack_to_bytes(packed.packed_bits(), k);

    // Normalize original to uppercase for comparison
    let normalized: Vec<u8> = data.iter().map(|b| b.to_ascii_uppercase()).collect();

    assert_eq!(unpacked, normalized, "Pack/unpack roundtrip failed");
});
