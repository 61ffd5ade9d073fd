#![forbid(unsafe_code)]

//! Data model shared by the asciidag parser, exporters, and CLI.
//!
//! A [`Graph`] holds the commit-like [`Node`]s recovered from an ASCII
//! drawing together with the [`BranchLabel`] annotations found next to them.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Horizontal output units per grid column.
pub const PIXELS_PER_CHARACTER_X: usize = 25;
/// Vertical output units per grid row.
pub const PIXELS_PER_CHARACTER_Y: usize = 40;
/// Number of spaces a tab expands to before any column is measured.
pub const TAB_WIDTH: usize = 8;
/// Characters that only draw connectivity and never belong to a label.
pub const EDGE_CHARACTERS: [char; 4] = ['-', '/', '\\', '|'];

const PRIME: &str = "\u{2032}";
const PRIME_ENTITY: &str = "&#8242;";

#[must_use]
pub fn is_edge_character(ch: char) -> bool {
    EDGE_CHARACTERS.contains(&ch)
}

/// Grid coordinate. Row 0 is the last line of the drawing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Apply a signed step, returning `None` when it leaves the non-negative quadrant.
    #[must_use]
    pub fn offset(self, dx: isize, dy: isize) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }

    /// Scale into the exporter's output coordinate space.
    #[must_use]
    pub const fn scaled(self, scale_x: usize, scale_y: usize) -> (usize, usize) {
        (self.x * scale_x, self.y * scale_y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Identifier assigned in discovery order, unique within one parsed graph.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub struct NodeId(pub usize);

impl NodeId {
    #[must_use]
    pub fn as_dot_id(self) -> String {
        format!("node{}", self.0)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node{}", self.0)
    }
}

/// A commit-like vertex recovered from the drawing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub position: Position,
    /// Parents in the order the edge tracer reached them.
    pub parents: Vec<NodeId>,
}

impl Node {
    /// Label with apostrophes shown as primes (`A'` becomes `A′`).
    #[must_use]
    pub fn display_label(&self) -> String {
        self.label.replace('\'', PRIME)
    }

    /// Label with apostrophes as the `&#8242;` entity understood by Graphviz.
    #[must_use]
    pub fn dot_label(&self) -> String {
        self.label.replace('\'', PRIME_ENTITY)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Human-readable annotation such as a branch name. Never a graph vertex.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchLabel {
    pub id: NodeId,
    pub label: String,
    pub position: Position,
}

impl BranchLabel {
    #[must_use]
    pub fn display_label(&self) -> String {
        self.label.replace('\'', PRIME)
    }

    #[must_use]
    pub fn dot_label(&self) -> String {
        self.label.replace('\'', PRIME_ENTITY)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("identifier {id} is used more than once")]
    DuplicateId { id: NodeId },
    #[error("node {node} lists unknown parent {parent}")]
    DanglingParent { node: NodeId, parent: NodeId },
    #[error("node {node} lists branch label {parent} as a parent")]
    ParentIsBranchLabel { node: NodeId, parent: NodeId },
}

/// Nodes and branch labels, each in discovery order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub branch_labels: Vec<BranchLabel>,
}

impl Graph {
    #[must_use]
    pub fn new(nodes: Vec<Node>, branch_labels: Vec<BranchLabel>) -> Self {
        Self {
            nodes,
            branch_labels,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.branch_labels.is_empty()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Resolve a node's parent ids, skipping any that are not in this graph.
    pub fn parents_of<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        node.parents.iter().filter_map(|parent| self.node(*parent))
    }

    /// First node carrying `label`.
    #[must_use]
    pub fn find_node(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.label == label)
    }

    /// All nodes carrying `label`, in discovery order.
    #[must_use]
    pub fn find_nodes(&self, label: &str) -> Vec<&Node> {
        self.nodes.iter().filter(|node| node.label == label).collect()
    }

    #[must_use]
    pub fn find_branch_label(&self, label: &str) -> Option<&BranchLabel> {
        self.branch_labels.iter().find(|branch| branch.label == label)
    }

    /// Number of parent relationships across all nodes.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.parents.len()).sum()
    }

    /// Nodes without parents.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_root())
    }

    /// Check the structural invariants every parsed graph upholds: identifiers
    /// are unique and each parent is a node of this graph.
    pub fn check_invariants(&self) -> Result<(), GraphError> {
        let mut seen = FxHashSet::default();
        let ids = self
            .nodes
            .iter()
            .map(|node| node.id)
            .chain(self.branch_labels.iter().map(|branch| branch.id));
        for id in ids {
            if !seen.insert(id) {
                return Err(GraphError::DuplicateId { id });
            }
        }

        let mut kinds: FxHashMap<NodeId, bool> = FxHashMap::default();
        kinds.extend(self.nodes.iter().map(|node| (node.id, true)));
        kinds.extend(self.branch_labels.iter().map(|branch| (branch.id, false)));

        for node in &self.nodes {
            for parent in &node.parents {
                match kinds.get(parent) {
                    Some(true) => {}
                    Some(false) => {
                        return Err(GraphError::ParentIsBranchLabel {
                            node: node.id,
                            parent: *parent,
                        });
                    }
                    None => {
                        return Err(GraphError::DanglingParent {
                            node: node.id,
                            parent: *parent,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
