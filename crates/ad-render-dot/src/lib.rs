#![forbid(unsafe_code)]

//! Graphviz DOT export for asciidag graphs.
//!
//! Nodes keep their drawing coordinates: each grid cell becomes
//! [`PIXELS_PER_CHARACTER_X`] × [`PIXELS_PER_CHARACTER_Y`] output units, so
//! `neato -n` reproduces the original picture.

mod document;

pub use document::{DotDocument, Statement, quote, quote_id};

use ad_core::{Graph, PIXELS_PER_CHARACTER_X, PIXELS_PER_CHARACTER_Y, Position};
use serde::Deserialize;

/// Configuration for DOT rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DotRenderConfig {
    /// Output units per grid column.
    pub scale_x: usize,
    /// Output units per grid row.
    pub scale_y: usize,
    /// Shape applied to every node.
    pub node_shape: String,
    /// Shape for branch labels; must differ from the node shape to read as text.
    pub label_shape: String,
    /// Emit `digraph NAME {` instead of an anonymous graph.
    pub graph_name: Option<String>,
    /// Append `!` to positions so Graphviz keeps them fixed.
    pub pin_positions: bool,
}

impl Default for DotRenderConfig {
    fn default() -> Self {
        Self {
            scale_x: PIXELS_PER_CHARACTER_X,
            scale_y: PIXELS_PER_CHARACTER_Y,
            node_shape: String::from("circle"),
            label_shape: String::from("none"),
            graph_name: None,
            pin_positions: false,
        }
    }
}

/// Render a graph to DOT with the default configuration.
#[must_use]
pub fn render_dot(graph: &Graph) -> String {
    render_dot_with_config(graph, &DotRenderConfig::default())
}

/// Render a graph to DOT with custom configuration.
#[must_use]
pub fn render_dot_with_config(graph: &Graph, config: &DotRenderConfig) -> String {
    build_document(graph, config).to_string()
}

/// Build the statement list without serializing it.
#[must_use]
pub fn build_document(graph: &Graph, config: &DotRenderConfig) -> DotDocument {
    let mut doc = DotDocument::new();
    if let Some(name) = &config.graph_name {
        doc = doc.name(name.clone());
    }

    doc.push(Statement::NodeDefaults {
        shape: config.node_shape.clone(),
    });

    for node in &graph.nodes {
        doc.push(Statement::Node {
            id: node.id.as_dot_id(),
            attrs: vec![
                ("label".to_string(), quote(&node.dot_label())),
                ("pos".to_string(), position_attr(node.position, config)),
            ],
        });
        for parent in &node.parents {
            doc.push(Statement::Edge {
                from: node.id.as_dot_id(),
                to: parent.as_dot_id(),
            });
        }
    }

    for branch in &graph.branch_labels {
        doc.push(Statement::Node {
            id: branch.id.as_dot_id(),
            attrs: vec![
                ("shape".to_string(), quote_id(&config.label_shape)),
                ("label".to_string(), quote(&branch.dot_label())),
                ("pos".to_string(), position_attr(branch.position, config)),
            ],
        });
    }

    doc
}

fn position_attr(position: Position, config: &DotRenderConfig) -> String {
    let (x, y) = position.scaled(config.scale_x, config.scale_y);
    let pin = if config.pin_positions { "!" } else { "" };
    quote(&format!("{x},{y}{pin}"))
}

#[cfg(test)]
mod tests {
    use ad_core::{BranchLabel, Graph, Node, NodeId, Position};
    use ad_parser::parse;
    use proptest::prelude::*;

    use super::{DotRenderConfig, render_dot, render_dot_with_config};

    fn two_commits() -> Graph {
        Graph::new(
            vec![
                Node {
                    id: NodeId(0),
                    label: "A".to_string(),
                    position: Position::new(0, 0),
                    parents: Vec::new(),
                },
                Node {
                    id: NodeId(1),
                    label: "B'".to_string(),
                    position: Position::new(4, 1),
                    parents: vec![NodeId(0)],
                },
            ],
            vec![BranchLabel {
                id: NodeId(2),
                label: "topic".to_string(),
                position: Position::new(8, 1),
            }],
        )
    }

    #[test]
    fn renders_nodes_edges_and_labels() {
        let dot = render_dot(&two_commits());
        assert_eq!(
            dot,
            "digraph {\n  node [shape=circle];\n  node0 [label=\"A\", pos=\"0,0\"];\n  node1 [label=\"B&#8242;\", pos=\"100,40\"];\n  node1 -> node0;\n  node2 [shape=none, label=\"topic\", pos=\"200,40\"];\n}"
        );
    }

    #[test]
    fn config_controls_scale_shapes_and_pinning() {
        let config = DotRenderConfig {
            scale_x: 10,
            scale_y: 20,
            node_shape: "point".to_string(),
            label_shape: "plaintext".to_string(),
            graph_name: Some("history".to_string()),
            pin_positions: true,
        };
        let dot = render_dot_with_config(&two_commits(), &config);
        assert!(dot.starts_with("digraph history {\n  node [shape=point];"));
        assert!(dot.contains("node1 [label=\"B&#8242;\", pos=\"40,20!\"];"));
        assert!(dot.contains("node2 [shape=plaintext, label=\"topic\", pos=\"80,20!\"];"));
    }

    #[test]
    fn empty_graph_renders_header_only() {
        assert_eq!(
            render_dot(&Graph::default()),
            "digraph {\n  node [shape=circle];\n}"
        );
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: DotRenderConfig =
            toml::from_str("scale_x = 12\npin_positions = true\n").expect("parse config");
        assert_eq!(config.scale_x, 12);
        assert_eq!(config.scale_y, 40);
        assert_eq!(config.node_shape, "circle");
        assert!(config.pin_positions);
        assert!(toml::from_str::<DotRenderConfig>("colour = \"red\"").is_err());
    }

    #[test]
    fn renders_parsed_merge() {
        let graph = parse("      A---B---C topic\n     /         \\\nD---E---F---G---H master\n");
        let dot = render_dot(&graph);
        let h = graph.find_node("H").expect("H");
        for parent in &h.parents {
            assert!(dot.contains(&format!("{} -> {};", h.id.as_dot_id(), parent.as_dot_id())));
        }
        assert!(dot.contains("shape=none, label=\"master\""));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_one_edge_line_per_parent(input in "[ oAB1'\\-/\\\\|\n]{0,200}") {
            let graph = parse(&input);
            let dot = render_dot(&graph);
            prop_assert_eq!(dot.matches(" -> ").count(), graph.edge_count());
            prop_assert!(dot.starts_with("digraph {"), "unexpected header in {:?}", dot);
            prop_assert_eq!(dot.chars().last(), Some('}'));
        }
    }
}
