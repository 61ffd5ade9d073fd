#![forbid(unsafe_code)]

//! Recover commit graphs from ASCII-art history drawings.
//!
//! ```text
//!       A---B---C topic
//!      /
//! D---E---F---G master
//! ```
//!
//! Parsing runs in four forward passes: the text is normalized into a grid
//! (tabs expanded, rows reversed), labels and node tokens are scanned and
//! erased, every node's parents are traced through the line-drawing
//! characters, and finally entities are classified into nodes and branch
//! labels.

mod assembler;
mod grid;
mod scanner;
mod token;
mod tracer;

use ad_core::{Graph, NodeId};
use serde_json::json;
use tracing::{debug, trace};

use crate::assembler::GraphAssembler;
use crate::grid::Grid;
use crate::tracer::EdgeTracer;

/// Parse an ASCII drawing into a [`Graph`].
///
/// Total over all input: malformed drawings yield missing edges or extra
/// branch labels, never an error.
#[must_use]
pub fn parse(text: &str) -> Graph {
    let mut grid = Grid::from_text(text);
    let mut assembler = GraphAssembler::new();
    scanner::scan(&mut grid, &mut assembler);

    let tracer = EdgeTracer::new(&grid, assembler.node_positions());
    let traced: Vec<(NodeId, Vec<NodeId>)> = assembler
        .scanned_nodes()
        .map(|(id, position)| {
            let parents = tracer.find_parents(position);
            trace!("Traced {id} at {position}: parents={parents:?}");
            (id, parents)
        })
        .collect();

    debug!(
        "Scanned: rows={}, candidates={}, edges={}",
        grid.height(),
        assembler.node_count(),
        traced.iter().map(|(_, parents)| parents.len()).sum::<usize>()
    );

    for (id, parents) in traced {
        assembler.set_parents(id, parents);
    }
    assembler.finish()
}

/// Compact JSON summary of a parsed graph.
#[must_use]
pub fn parse_summary_json(graph: &Graph) -> String {
    json!({
        "node_count": graph.nodes.len(),
        "edge_count": graph.edge_count(),
        "branch_label_count": graph.branch_labels.len(),
        "root_count": graph.roots().count(),
        "branch_labels": graph
            .branch_labels
            .iter()
            .map(|branch| branch.label.as_str())
            .collect::<Vec<_>>(),
    })
    .to_string()
}
