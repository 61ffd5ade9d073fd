#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let graph = ad_parser::parse(&text);
    let dot = ad_render_dot::render_dot(&graph);
    let edges = dot
        .lines()
        .filter(|line| line.contains(" -> ") && !line.contains('['))
        .count();
    assert_eq!(edges, graph.edge_count());

    if let Ok(json) = serde_json::to_string(&graph) {
        let restored: ad_core::Graph = serde_json::from_str(&json).expect("graph json round-trips");
        assert_eq!(restored, graph);
    }
});
