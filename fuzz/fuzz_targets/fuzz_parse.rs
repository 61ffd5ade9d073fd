#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let graph = ad_parser::parse(text);
        assert!(graph.check_invariants().is_ok());
        let _ = ad_parser::parse_summary_json(&graph);
    }
});
