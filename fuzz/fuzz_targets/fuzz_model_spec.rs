//! Fuzz target for model.json parsing and context-tree encoding.
//!
//! Arbitrary input must either be rejected with an error or produce a model
//! whose tree encodes without panicking.

#![no_main]

use ct_config::load::parse_model;
use ct_core::tree::{to_finite_markov, ContextModel};
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(spec) = parse_model(Path::new("fuzz.json"), text) else {
        return;
    };
    if let Ok(model) = ContextModel::from_spec(&spec) {
        if model.height() > 0 {
            let _ = to_finite_markov(&model, 1 << 12);
        }
    }
});
