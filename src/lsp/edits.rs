//! Turning fixed buffer text into LSP text edits.

use tower_lsp::lsp_types::TextEdit;

use crate::document::LineIndex;
use crate::whitespace::Region;

/// A single edit turning `before` into `after`, covering only the span
/// between their common prefix and common suffix. `None` if nothing changed.
pub fn minimal_edit(before: &LineIndex, after: &str) -> Option<TextEdit> {
    let old = before.source();
    if old == after {
        return None;
    }

    let prefix = common_prefix_len(old, after);
    let suffix = common_suffix_len(&old[prefix..], &after[prefix..]);

    let replaced = Region::new(prefix, old.len() - suffix);
    let new_text = after[prefix..after.len() - suffix].to_string();

    Some(TextEdit {
        range: before.region_to_range(replaced),
        new_text,
    })
}

/// Length in bytes of the longest common prefix, on a char boundary.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()))
}

/// Length in bytes of the longest common suffix, on a char boundary.
fn common_suffix_len(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(ca, cb)| ca == cb)
        .map(|(c, _)| c.len_utf8())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp::lsp_types::Position;

    fn edit(before: &str, after: &str) -> Option<TextEdit> {
        minimal_edit(&LineIndex::new(before.to_string()), after)
    }

    #[test]
    fn unchanged_text() {
        assert_eq!(edit("abc\n", "abc\n"), None);
    }

    #[test]
    fn appended_newline() {
        let e = edit("abc", "abc\n").unwrap();
        assert_eq!(e.range.start, Position::new(0, 3));
        assert_eq!(e.range.end, Position::new(0, 3));
        assert_eq!(e.new_text, "\n");
    }

    #[test]
    fn spans_first_to_last_change() {
        let e = edit("a  \nb   c\n", "a\nb c\n").unwrap();
        assert_eq!(e.range.start, Position::new(0, 1));
        assert_eq!(e.range.end, Position::new(1, 3));
        assert_eq!(e.new_text, "\nb");
    }

    #[test]
    fn multibyte_boundaries() {
        let e = edit("\u{e9}  \u{e9}", "\u{e9} \u{e9}").unwrap();
        assert_eq!(e.range.start, Position::new(0, 2));
        assert_eq!(e.range.end, Position::new(0, 3));
        assert_eq!(e.new_text, "");
    }
}
