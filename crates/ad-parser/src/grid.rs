use ad_core::{Position, TAB_WIDTH};

/// Character rows of a drawing, bottom row first.
///
/// Reads outside the drawn area yield `None` rather than panicking, so a
/// traced path that runs off a short row or off the grid simply dead-ends.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Grid {
    rows: Vec<Vec<char>>,
}

impl Grid {
    #[must_use]
    pub(crate) fn from_text(text: &str) -> Self {
        let expanded = text.replace('\t', &" ".repeat(TAB_WIDTH));
        let mut rows: Vec<Vec<char>> = expanded
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).chars().collect())
            .collect();
        while rows.last().is_some_and(Vec::is_empty) {
            rows.pop();
        }
        rows.reverse();
        Self { rows }
    }

    #[must_use]
    pub(crate) fn height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub(crate) fn row(&self, y: usize) -> Option<&[char]> {
        self.rows.get(y).map(Vec::as_slice)
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> Option<&mut [char]> {
        self.rows.get_mut(y).map(Vec::as_mut_slice)
    }

    #[must_use]
    pub(crate) fn get(&self, position: Position) -> Option<char> {
        self.row(position.y)?.get(position.x).copied()
    }
}
