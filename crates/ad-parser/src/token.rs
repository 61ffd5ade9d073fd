//! Node-token grammar: a word character, an optional digit, then an optional
//! apostrophe or asterisk; or a lone asterisk.

/// Longest token the grammar accepts (`r2'`).
pub(crate) const MAX_TOKEN_LEN: usize = 3;

#[must_use]
pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Length of the token starting at `start`, if one starts there.
#[must_use]
pub(crate) fn token_len_at(row: &[char], start: usize) -> Option<usize> {
    let first = *row.get(start)?;
    if !is_word_char(first) {
        return (first == '*').then_some(1);
    }

    let mut len = 1;
    if row.get(start + len).is_some_and(char::is_ascii_digit) {
        len += 1;
    }
    if row
        .get(start + len)
        .is_some_and(|ch| matches!(*ch, '\'' | '*'))
    {
        len += 1;
    }
    Some(len)
}

/// Whether `text` is exactly one token.
#[must_use]
pub(crate) fn is_token(text: &[char]) -> bool {
    !text.is_empty() && token_len_at(text, 0) == Some(text.len())
}

/// Earliest column `s` such that `row[s..=end]` is exactly one token.
///
/// Used when a traced path lands on the tail of a wider label such as `o'`
/// or `r1`: the token's first column is where the node is registered.
#[must_use]
pub(crate) fn token_start_ending_at(row: &[char], end: usize) -> Option<usize> {
    if end >= row.len() {
        return None;
    }
    let first = end.saturating_sub(MAX_TOKEN_LEN - 1);
    (first..=end).find(|&start| is_token(&row[start..=end]))
}

#[cfg(test)]
mod tests {
    use super::{is_token, token_len_at, token_start_ending_at};

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn measures_tokens() {
        assert_eq!(token_len_at(&chars("o---o"), 0), Some(1));
        assert_eq!(token_len_at(&chars("r1---r2"), 0), Some(2));
        assert_eq!(token_len_at(&chars("r2'--"), 0), Some(3));
        assert_eq!(token_len_at(&chars("B*--D*"), 0), Some(2));
        assert_eq!(token_len_at(&chars("*"), 0), Some(1));
        assert_eq!(token_len_at(&chars("AB"), 0), Some(1));
        assert_eq!(token_len_at(&chars("-o"), 0), None);
        assert_eq!(token_len_at(&chars("'"), 0), None);
        assert_eq!(token_len_at(&chars("o"), 3), None);
    }

    #[test]
    fn full_token_match() {
        assert!(is_token(&chars("o'")));
        assert!(is_token(&chars("x9*")));
        assert!(!is_token(&chars("ab")));
        assert!(!is_token(&chars("-o")));
        assert!(!is_token(&[]));
    }

    #[test]
    fn finds_start_of_wide_labels() {
        let row = chars("    r1---r2'--r3'");
        assert_eq!(token_start_ending_at(&row, 5), Some(4));
        assert_eq!(token_start_ending_at(&row, 11), Some(9));
        assert_eq!(token_start_ending_at(&row, 4), Some(4));
        assert_eq!(token_start_ending_at(&row, 7), None);
        assert_eq!(token_start_ending_at(&row, 40), None);
    }

    #[test]
    fn dots_never_resolve_to_tokens() {
        let row = chars("X--...---o");
        assert_eq!(token_start_ending_at(&row, 4), None);
    }
}
