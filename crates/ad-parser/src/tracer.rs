//! Parent discovery by following line-drawing characters leftwards.
//!
//! A search state is a grid position, the edge characters acceptable there,
//! and the vertical [`Direction`] the path has committed to. Once a path has
//! moved up (through `\`) or down (through `/`) it may never turn around, so
//! crossing lines are not bridged.

use ad_core::{NodeId, Position, is_edge_character};
use rustc_hash::FxHashMap;

use crate::grid::Grid;
use crate::token::token_start_ending_at;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
    Either,
}

impl Direction {
    /// Combine the path's direction with a step's. `None` means the step
    /// would reverse the path's vertical sense.
    #[must_use]
    pub(crate) fn lock(self, step: Direction) -> Option<Direction> {
        match (self, step) {
            (current, Direction::Either) => Some(current),
            (Direction::Either, locked) => Some(locked),
            (current, locked) if current == locked => Some(current),
            _ => None,
        }
    }

    const fn dy(self) -> isize {
        match self {
            Self::Up => 1,
            Self::Down => -1,
            Self::Either => 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Step {
    dx: isize,
    dy: isize,
    accepts: &'static [char],
    direction: Direction,
    /// The under-slash step only continues through `|`.
    lands_on_nodes: bool,
}

impl Step {
    const fn new(dx: isize, dy: isize, accepts: &'static [char], direction: Direction) -> Self {
        Self {
            dx,
            dy,
            accepts,
            direction,
            lands_on_nodes: true,
        }
    }
}

const INITIAL_STEPS: [Step; 3] = [
    Step::new(-1, 1, &['\\'], Direction::Up),
    Step::new(-1, 0, &['-'], Direction::Either),
    Step::new(-1, -1, &['/'], Direction::Down),
];
const FROM_DASH: [Step; 1] = [Step::new(-1, 0, &['-'], Direction::Either)];
const FROM_BACKSLASH: [Step; 1] = [Step::new(-1, 1, &['-', '\\', '|'], Direction::Up)];
const FROM_SLASH: [Step; 2] = [
    Step::new(-1, -1, &['/', '-', '|'], Direction::Down),
    // Diagrams often stack a `|` directly beneath a `/`.
    Step {
        lands_on_nodes: false,
        ..Step::new(0, -1, &['|'], Direction::Down)
    },
];
const PIPE_UP: [Step; 1] = [Step::new(0, 1, &['|'], Direction::Up)];
const PIPE_DOWN: [Step; 1] = [Step::new(0, -1, &['|'], Direction::Down)];

fn steps_from(edge: char, direction: Direction) -> &'static [Step] {
    match (edge, direction) {
        ('-', _) => &FROM_DASH,
        ('\\', _) => &FROM_BACKSLASH,
        ('/', _) => &FROM_SLASH,
        ('|', Direction::Up) => &PIPE_UP,
        ('|', Direction::Down) => &PIPE_DOWN,
        _ => &[],
    }
}

#[derive(Debug, Clone, Copy)]
struct Probe {
    position: Position,
    accepts: &'static [char],
    direction: Direction,
    lands_on_nodes: bool,
}

/// Read-only view over the scanned grid and the node position index.
pub(crate) struct EdgeTracer<'a> {
    grid: &'a Grid,
    nodes: &'a FxHashMap<Position, NodeId>,
}

impl<'a> EdgeTracer<'a> {
    pub(crate) fn new(grid: &'a Grid, nodes: &'a FxHashMap<Position, NodeId>) -> Self {
        Self { grid, nodes }
    }

    /// Parents reachable from the node at `origin`, in the order a
    /// depth-first search tries up, across, then down. Not deduplicated.
    #[must_use]
    pub(crate) fn find_parents(&self, origin: Position) -> Vec<NodeId> {
        let mut parents = Vec::new();
        let mut pending = Vec::new();
        self.push_steps(&mut pending, origin, Direction::Either, &INITIAL_STEPS);

        while let Some(probe) = pending.pop() {
            if probe.lands_on_nodes {
                if let Some(&parent) = self.nodes.get(&probe.position) {
                    parents.push(parent);
                    continue;
                }
            }

            let Some(ch) = self.grid.get(probe.position) else {
                continue;
            };

            if is_edge_character(ch) {
                if probe.accepts.contains(&ch) {
                    let steps = steps_from(ch, probe.direction);
                    self.push_steps(&mut pending, probe.position, probe.direction, steps);
                }
            } else if probe.lands_on_nodes && !ch.is_whitespace() {
                if let Some(parent) = self.resolve_wide_label(probe.position) {
                    parents.push(parent);
                }
            }
        }

        parents
    }

    /// Queue `steps` so they pop in declaration order.
    fn push_steps(
        &self,
        pending: &mut Vec<Probe>,
        from: Position,
        direction: Direction,
        steps: &[Step],
    ) {
        for step in steps.iter().rev() {
            let Some(direction) = direction.lock(step.direction) else {
                continue;
            };
            debug_assert!(step.dy == 0 || step.dy == direction.dy());
            let Some(position) = from.offset(step.dx, step.dy) else {
                continue;
            };
            if position.y >= self.grid.height() {
                continue;
            }
            pending.push(Probe {
                position,
                accepts: step.accepts,
                direction,
                lands_on_nodes: step.lands_on_nodes,
            });
        }
    }

    /// A path that reaches the tail of a wider label (`o'`, `r1`, `B*`)
    /// connects to the node registered at the label's first column.
    fn resolve_wide_label(&self, position: Position) -> Option<NodeId> {
        let row = self.grid.row(position.y)?;
        let start = token_start_ending_at(row, position.x)?;
        self.nodes.get(&Position::new(start, position.y)).copied()
    }
}
