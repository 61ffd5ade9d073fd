use std::ops::Range;

use ad_core::{Position, is_edge_character};
use tracing::trace;

use crate::assembler::GraphAssembler;
use crate::grid::Grid;
use crate::token::{is_word_char, token_len_at};

const ARROW_MARKER: [char; 3] = ['<', '-', '-'];
/// Shortest run of word characters read as a trailing branch name.
const MIN_UNQUOTED_LABEL_LEN: usize = 3;

/// A trailing annotation found on one row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BranchLabelMatch {
    label: String,
    column: usize,
    erase: Range<usize>,
}

/// Register every branch label and node token in `grid` with `assembler`,
/// blanking consumed label text so the tracer only sees drawing characters.
pub(crate) fn scan(grid: &mut Grid, assembler: &mut GraphAssembler) {
    for y in 0..grid.height() {
        let Some(row) = grid.row_mut(y) else {
            continue;
        };

        if let Some(found) = find_branch_label(row) {
            trace!("Row {y}: branch label {:?} at column {}", found.label, found.column);
            row[found.erase.clone()].fill(' ');
            assembler.add_branch_label(found.label, Position::new(found.column, y));
        }

        let mut x = 0;
        while x < row.len() {
            match token_len_at(row, x) {
                Some(len) => {
                    let label: String = row[x..x + len].iter().collect();
                    assembler.add_node(label, Position::new(x, y));
                    x += len;
                }
                None => x += 1,
            }
        }
    }
}

/// Try each trailing-annotation form in priority order; only one per row.
fn find_branch_label(row: &[char]) -> Option<BranchLabelMatch> {
    match_arrowed(row)
        .or_else(|| match_delimited(row, '"', '"'))
        .or_else(|| match_delimited(row, '(', ')'))
        .or_else(|| match_unquoted(row))
}

/// `   <-- label text` at end of row. The label sits where the arrow starts.
fn match_arrowed(row: &[char]) -> Option<BranchLabelMatch> {
    // `<` is not a label character, so only the last one in the row can
    // begin a marker whose tail is all label text.
    let start = row.iter().rposition(|&ch| !is_arrowed_label_char(ch))?;
    if start == 0 || !row[start..].starts_with(&ARROW_MARKER) || !row[start - 1].is_whitespace() {
        return None;
    }
    let after = start + ARROW_MARKER.len();
    if !row.get(after)?.is_whitespace() {
        return None;
    }
    let text_start = after + row[after..].iter().position(|ch| !ch.is_whitespace())?;
    let label = collect_trimmed(&row[text_start..]);
    is_usable_label(&label).then(|| BranchLabelMatch {
        label,
        column: start,
        erase: start..row.len(),
    })
}

fn is_arrowed_label_char(ch: char) -> bool {
    is_word_char(ch) || ch.is_whitespace() || matches!(ch, ':' | '-')
}

/// `"label"` or `(label)` followed only by whitespace.
fn match_delimited(row: &[char], open: char, close: char) -> Option<BranchLabelMatch> {
    let end = row.iter().rposition(|ch| !ch.is_whitespace())?;
    if row[end] != close {
        return None;
    }
    // The body may not contain the closing delimiter, so the match starts at
    // the first opener after the previous closer.
    let start = if open == close {
        row[..end].iter().rposition(|&ch| ch == open)?
    } else {
        let search_from = row[..end]
            .iter()
            .rposition(|&ch| ch == close)
            .map_or(0, |idx| idx + 1);
        search_from + row[search_from..end].iter().position(|&ch| ch == open)?
    };
    let label = collect_trimmed(&row[start + 1..end]);
    if !is_usable_label(&label) {
        return None;
    }
    Some(BranchLabelMatch {
        label,
        column: start,
        erase: start..end + 1,
    })
}

/// Three or more word characters and everything after them.
fn match_unquoted(row: &[char]) -> Option<BranchLabelMatch> {
    let start = row
        .windows(MIN_UNQUOTED_LABEL_LEN)
        .position(|window| window.iter().all(|&ch| is_word_char(ch)))?;
    Some(BranchLabelMatch {
        label: collect_trimmed(&row[start..]),
        column: start,
        erase: start..row.len(),
    })
}

/// Labels made only of drawing characters would read as edges.
fn is_usable_label(label: &str) -> bool {
    !label.is_empty() && !label.chars().all(is_edge_character)
}

fn collect_trimmed(chars: &[char]) -> String {
    let text: String = chars.iter().collect();
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{BranchLabelMatch, find_branch_label, scan};
    use crate::assembler::GraphAssembler;
    use crate::grid::Grid;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    fn label_of(text: &str) -> Option<(String, usize)> {
        find_branch_label(&chars(text)).map(|found| (found.label, found.column))
    }

    #[test]
    fn arrowed_labels_point_at_the_arrow() {
        assert_eq!(
            label_of("         o--o--o <-- Branch A"),
            Some(("Branch A".to_string(), 17))
        );
        assert_eq!(
            label_of("   t--m <-- their branch:"),
            Some(("their branch:".to_string(), 8))
        );
        assert_eq!(
            label_of("   A---E   <-- fixed-up topic branch"),
            Some(("fixed-up topic branch".to_string(), 11))
        );
    }

    #[test]
    fn arrowed_match_erases_marker_and_text() {
        let row = chars(" o--o <-- master");
        let found = super::match_arrowed(&row).expect("arrow label");
        assert_eq!(
            found,
            BranchLabelMatch {
                label: "master".to_string(),
                column: 6,
                erase: 6..row.len(),
            }
        );
    }

    #[test]
    fn arrow_without_label_text_falls_through() {
        assert_eq!(label_of("o--o <--   "), None);
        assert_eq!(label_of("o--o <-- -"), None);
        assert_eq!(label_of("o--o \"|\""), None);
    }

    #[test]
    fn only_the_last_arrow_can_carry_the_label() {
        assert_eq!(label_of("o <-- a <-- b"), Some(("b".to_string(), 8)));
        assert_eq!(label_of("o <-- a <--"), None);

        let mut row = "o".to_string();
        row.push_str(&" <--".repeat(5_000));
        row.push_str(" !");
        assert_eq!(label_of(&row), None);
    }

    #[test]
    fn quoted_labels_drop_their_quotes() {
        assert_eq!(
            label_of("            \"master\"  "),
            Some(("master".to_string(), 12))
        );
        assert_eq!(
            label_of("        o---o\"master\""),
            Some(("master".to_string(), 13))
        );
        assert_eq!(
            label_of("o---o \" master \""),
            Some(("master".to_string(), 6))
        );
        assert_eq!(
            label_of("o---* ( pretend merge )"),
            Some(("pretend merge".to_string(), 6))
        );
    }

    #[test]
    fn parenthesized_labels() {
        assert_eq!(
            label_of("    o---* (pretend merge)"),
            Some(("pretend merge".to_string(), 10))
        );
        assert_eq!(label_of("o---o ()"), None);
    }

    #[test]
    fn quoted_form_wins_over_unquoted() {
        assert_eq!(
            label_of("o---o  \"topic\""),
            Some(("topic".to_string(), 7))
        );
    }

    #[test]
    fn unquoted_labels_take_the_rest_of_the_row() {
        assert_eq!(
            label_of("    r1---r2---r3 remotes/git-svn"),
            Some(("remotes/git-svn".to_string(), 17))
        );
        assert_eq!(label_of("A-B-C"), None);
        assert_eq!(label_of("1 2 3"), None);
    }

    #[test]
    fn scanning_blanks_labels_before_collecting_tokens() {
        let mut grid = Grid::from_text("o---o\"master\"\n");
        let mut assembler = GraphAssembler::new();
        scan(&mut grid, &mut assembler);
        assert_eq!(assembler.node_count(), 2);
        assert_eq!(grid.row(0), Some(&chars("o---o        ")[..]));

        let graph = {
            let o = assembler.scanned_nodes().map(|(id, _)| id).collect::<Vec<_>>();
            assembler.set_parents(o[1], vec![o[0]]);
            assembler.finish()
        };
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.branch_labels[0].label, "master");
    }

    #[test]
    fn tokens_split_on_grammar_boundaries() {
        let mut grid = Grid::from_text("Y*--...--B*--D* 1 r2' AB\n");
        let mut assembler = GraphAssembler::new();
        scan(&mut grid, &mut assembler);
        let positions: Vec<usize> = assembler.scanned_nodes().map(|(_, p)| p.x).collect();
        assert_eq!(positions, vec![0, 9, 13, 16, 18, 22, 23]);
    }
}
