use ad_core::{BranchLabel, Graph, Node, NodeId, Position};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityKind {
    Node,
    BranchLabel,
}

#[derive(Debug, Clone)]
struct Entity {
    id: NodeId,
    label: String,
    position: Position,
    kind: EntityKind,
    parents: Vec<NodeId>,
}

/// Collects scanned entities for a single parse and turns them into a [`Graph`].
///
/// Identifiers come from a counter owned by the assembler, so every parse
/// numbers its entities from zero.
pub(crate) struct GraphAssembler {
    entities: Vec<Entity>,
    nodes_by_position: FxHashMap<Position, NodeId>,
}

impl GraphAssembler {
    pub(crate) fn new() -> Self {
        Self {
            entities: Vec::new(),
            nodes_by_position: FxHashMap::default(),
        }
    }

    fn next_id(&self) -> NodeId {
        NodeId(self.entities.len())
    }

    pub(crate) fn add_node(&mut self, label: String, position: Position) -> NodeId {
        let id = self.next_id();
        self.entities.push(Entity {
            id,
            label,
            position,
            kind: EntityKind::Node,
            parents: Vec::new(),
        });
        self.nodes_by_position.insert(position, id);
        id
    }

    /// Branch labels get an id but are never registered as edge endpoints.
    pub(crate) fn add_branch_label(&mut self, label: String, position: Position) -> NodeId {
        let id = self.next_id();
        self.entities.push(Entity {
            id,
            label,
            position,
            kind: EntityKind::BranchLabel,
            parents: Vec::new(),
        });
        id
    }

    pub(crate) fn node_positions(&self) -> &FxHashMap<Position, NodeId> {
        &self.nodes_by_position
    }

    /// Scanned node candidates in discovery order.
    pub(crate) fn scanned_nodes(&self) -> impl Iterator<Item = (NodeId, Position)> + '_ {
        self.entities
            .iter()
            .filter(|entity| entity.kind == EntityKind::Node)
            .map(|entity| (entity.id, entity.position))
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes_by_position.len()
    }

    pub(crate) fn set_parents(&mut self, id: NodeId, parents: Vec<NodeId>) {
        if let Some(entity) = self.entities.get_mut(id.0) {
            debug_assert!(entity.parents.is_empty(), "parents of {id} written twice");
            entity.parents = parents;
        }
    }

    /// Classify entities once every node has been traced. A scanned node with
    /// no parents that nobody points at is an annotation, not a vertex.
    pub(crate) fn finish(self) -> Graph {
        let referenced: FxHashSet<NodeId> = self
            .entities
            .iter()
            .flat_map(|entity| entity.parents.iter().copied())
            .collect();

        let mut nodes = Vec::new();
        let mut branch_labels = Vec::new();
        let mut demoted = 0usize;

        for entity in self.entities {
            let connected = !entity.parents.is_empty() || referenced.contains(&entity.id);
            match entity.kind {
                EntityKind::Node if connected => nodes.push(Node {
                    id: entity.id,
                    label: entity.label,
                    position: entity.position,
                    parents: entity.parents,
                }),
                kind => {
                    if kind == EntityKind::Node {
                        demoted += 1;
                    }
                    branch_labels.push(BranchLabel {
                        id: entity.id,
                        label: entity.label,
                        position: entity.position,
                    });
                }
            }
        }

        debug!(
            "Assembled graph: nodes={}, branch_labels={}, demoted={demoted}",
            nodes.len(),
            branch_labels.len()
        );

        Graph::new(nodes, branch_labels)
    }
}
