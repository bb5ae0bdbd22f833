//! Fuzz target for whitespace-separated sequence files.

#![no_main]

use ct_common::Alphabet;
use ct_core::sequence::{format_symbols, parse_symbols};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let alphabet = match Alphabet::new(["A", "C", "G", "T"]) {
        Ok(alphabet) => alphabet,
        Err(_) => return,
    };
    if let Ok(symbols) = parse_symbols(text, &alphabet) {
        // Anything that parses must render back to a parseable sequence.
        let rendered = format_symbols(&symbols, &alphabet).expect("encoded symbols decode");
        let reparsed = parse_symbols(&rendered, &alphabet).expect("rendered sequence parses");
        assert_eq!(symbols, reparsed);
    }
});
