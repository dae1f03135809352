//! Fuzz target for the string similarity ratio.
//!
//! This fuzzer tests that similarity scoring:
//! 1. Never panics on arbitrary string pairs
//! 2. Always returns a value in [0, 1]
//! 3. Is symmetric in its arguments

#![no_main]

use crosscheck::similarity::similarity_ratio;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|pair: (&str, &str)| {
    let (a, b) = pair;

    let ratio = similarity_ratio(a, b);
    assert!((0.0..=1.0).contains(&ratio));
    assert_eq!(ratio, similarity_ratio(b, a));
});
