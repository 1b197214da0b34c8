//! Fuzz target for RLE decoding of untrusted counts.
//!
//! Third-party COCO files can carry negative or oversized run lengths; the
//! decoder must clamp and truncate them without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use maskcoco::rle::{decode, Rle};

fuzz_target!(|input: (Vec<i64>, u8, u8)| {
    let (counts, h, w) = input;
    if counts.len() > 4096 {
        return;
    }

    let (rle, _clamped) = Rle::from_raw_counts(&counts, h as u32, w as u32);
    let mask = decode(&rle);
    assert_eq!(mask.dimensions(), (w as u32, h as u32));
});
