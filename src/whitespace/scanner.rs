//! Detectors for the three issue kinds.
//!
//! Every detector has a full mode that searches the whole document. The
//! extra-spaces and trailing detectors also have an incremental mode that
//! only searches the lines touched by the current selections and keeps the
//! previously recorded regions found on every other line. Regions on
//! untouched lines are trusted as-is and never re-validated.

use std::sync::LazyLock;

use regex::Regex;

use super::kind::IssueKind;
use super::region::Region;
use super::view::TextView;

/// A space run flanked by a non-space character on each side.
static EXTRA_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S[ ]{2,}\S").unwrap());

static TRAILING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?mR)[ \t]+$").unwrap());

/// Scope in which runs of spaces are intentional.
const STRING_SCOPE: &str = "string.quoted";

/// How much of the document a scan covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Search the whole document.
    Full,
    /// Search the lines under the selections, keep prior regions elsewhere.
    Incremental,
}

/// Find the regions of `kind` in the view.
///
/// An incremental request on a view without selections has no touched
/// lines to go by and falls back to a full scan.
pub fn scan<V: TextView + ?Sized>(view: &V, kind: IssueKind, mode: ScanMode) -> Vec<Region> {
    let mode = match mode {
        ScanMode::Incremental if view.selections().is_empty() => ScanMode::Full,
        mode => mode,
    };

    match (kind, mode) {
        (IssueKind::Eof, _) => scan_eof(view),
        (IssueKind::ExtraSpaces, ScanMode::Full) => scan_extra_full(view),
        (IssueKind::ExtraSpaces, ScanMode::Incremental) => scan_extra_incremental(view),
        (IssueKind::Trailing, ScanMode::Full) => view.find_all(&TRAILING),
        (IssueKind::Trailing, ScanMode::Incremental) => scan_trailing_incremental(view),
    }
}

/// One region over the last character if the document does not end in a
/// newline. Empty documents have nothing to terminate.
pub fn scan_eof<V: TextView + ?Sized>(view: &V) -> Vec<Region> {
    match view.last_char() {
        None | Some('\n') => Vec::new(),
        Some(c) => {
            let size = view.size();
            vec![Region::new(size - c.len_utf8(), size)]
        }
    }
}

/// Non-overlapping runs across the document, skipping string literals.
///
/// A run whose leading flank is the trailing flank of the previous match
/// (`a  b  c`) is not found.
pub fn scan_extra_full<V: TextView + ?Sized>(view: &V) -> Vec<Region> {
    view.find_all(&EXTRA_SPACES)
        .into_iter()
        .filter(|found| !view.in_scope(found.start, STRING_SCOPE))
        .map(|found| strip_flanks(view, found).0)
        .collect()
}

/// Runs on the touched lines, merged with prior regions on other lines.
pub fn scan_extra_incremental<V: TextView + ?Sized>(view: &V) -> Vec<Region> {
    let lines = touched_lines(view);
    let mut fresh = Vec::new();

    for line in &lines {
        let mut seek = line.start;
        while seek < line.end {
            let Some(found) = view.find(&EXTRA_SPACES, Region::new(seek, line.end)) else {
                break;
            };
            let (run, trailing_flank) = strip_flanks(view, found);
            fresh.push(run);
            // Resume on the trailing flank so it can open the next run.
            seek = trailing_flank;
        }
    }

    merge(view.get_regions(IssueKind::ExtraSpaces), &lines, fresh)
}

/// At most one trailing run per touched line, merged with prior regions.
pub fn scan_trailing_incremental<V: TextView + ?Sized>(view: &V) -> Vec<Region> {
    let lines = touched_lines(view);
    let fresh = lines
        .iter()
        .filter_map(|line| view.find(&TRAILING, *line))
        .collect();

    merge(view.get_regions(IssueKind::Trailing), &lines, fresh)
}

/// Lines intersected by any selection, sorted and deduplicated.
pub fn touched_lines<V: TextView + ?Sized>(view: &V) -> Vec<Region> {
    let mut lines: Vec<Region> = view
        .selections()
        .into_iter()
        .flat_map(|selection| view.lines(selection))
        .collect();
    lines.sort();
    lines.dedup();
    lines
}

/// Combine fresh matches with the previous regions that reach no touched
/// line. A previous region touching one, including one an edit stretched
/// across a new line break, is superseded.
pub fn merge(previous: Vec<Region>, touched: &[Region], mut fresh: Vec<Region>) -> Vec<Region> {
    fresh.extend(
        previous
            .into_iter()
            .filter(|region| !touched.iter().any(|line| line.touches(*region))),
    );
    fresh.sort();
    fresh.dedup();
    fresh
}

/// Split a `\S[ ]{2,}\S` match into the interior space run and the offset
/// of its trailing flank.
fn strip_flanks<V: TextView + ?Sized>(view: &V, found: Region) -> (Region, usize) {
    let text = view.substr(found);
    let mut chars = text.chars();
    let lead = chars.next().map_or(0, char::len_utf8);
    let trail = chars.next_back().map_or(0, char::len_utf8);
    let trailing_flank = found.end - trail;
    (Region::new(found.start + lead, trailing_flank), trailing_flank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Buffer;

    fn cursor(offset: usize) -> Region {
        Region::new(offset, offset)
    }

    #[test]
    fn eof_missing_newline() {
        let buffer = Buffer::new("abc");
        assert_eq!(scan_eof(&buffer), vec![Region::new(2, 3)]);
    }

    #[test]
    fn eof_present_newline() {
        assert!(scan_eof(&Buffer::new("abc\n")).is_empty());
    }

    #[test]
    fn eof_empty_document() {
        assert!(scan_eof(&Buffer::new("")).is_empty());
    }

    #[test]
    fn eof_multibyte_last_char() {
        let buffer = Buffer::new("caf\u{e9}");
        assert_eq!(scan_eof(&buffer), vec![Region::new(3, 5)]);
    }

    #[test]
    fn extra_excludes_flanks() {
        let buffer = Buffer::new("a  b");
        assert_eq!(scan_extra_full(&buffer), vec![Region::new(1, 3)]);
    }

    #[test]
    fn extra_ignores_single_spaces_and_indentation() {
        let buffer = Buffer::new("    a b c\n\tx  \n");
        assert!(scan_extra_full(&buffer).is_empty());
    }

    #[test]
    fn extra_full_misses_adjacent_run() {
        let buffer = Buffer::new("a  b  c");
        assert_eq!(scan_extra_full(&buffer), vec![Region::new(1, 3)]);
    }

    #[test]
    fn extra_full_skips_string_literals() {
        let buffer = Buffer::new("x  = \"a  b\"\n");
        assert_eq!(scan_extra_full(&buffer), vec![Region::new(1, 3)]);
    }

    #[test]
    fn extra_flanks_may_be_multibyte() {
        let buffer = Buffer::new("\u{e9}  \u{e8}");
        assert_eq!(scan_extra_full(&buffer), vec![Region::new(2, 4)]);
    }

    #[test]
    fn extra_incremental_finds_adjacent_runs() {
        let mut buffer = Buffer::new("a  b  c\n");
        buffer.set_selections(vec![cursor(0)]);
        assert_eq!(
            scan_extra_incremental(&buffer),
            vec![Region::new(1, 3), Region::new(4, 6)]
        );
    }

    #[test]
    fn extra_incremental_keeps_untouched_lines() {
        // line 0: "a  b"   [0, 4)
        // line 1: "c d"    [5, 8)
        let mut buffer = Buffer::new("a  b\nc d\n");
        buffer.add_regions(IssueKind::ExtraSpaces, vec![Region::new(1, 3)]);
        buffer.set_selections(vec![cursor(6)]);
        assert_eq!(scan_extra_incremental(&buffer), vec![Region::new(1, 3)]);
    }

    #[test]
    fn trailing_finds_spaces_and_tabs() {
        let buffer = Buffer::new("a \t\nb\nc  ");
        assert_eq!(
            buffer.find_all(&TRAILING),
            vec![Region::new(1, 3), Region::new(7, 9)]
        );
    }

    #[test]
    fn trailing_handles_crlf() {
        let buffer = Buffer::new("a  \r\nb\r\n");
        assert_eq!(scan(&buffer, IssueKind::Trailing, ScanMode::Full), vec![Region::new(1, 3)]);
    }

    #[test]
    fn trailing_incremental_replaces_touched_line() {
        // line 0: "a  "    [0, 3)
        // line 1: "bc"     [4, 6), the space at 5 was just typed over
        let mut buffer = Buffer::new("a  \nbc\n");
        buffer.add_regions(IssueKind::Trailing, vec![Region::new(1, 3), Region::new(5, 6)]);
        buffer.set_selections(vec![cursor(6)]);
        assert_eq!(scan_trailing_incremental(&buffer), vec![Region::new(1, 3)]);
    }

    #[test]
    fn incremental_without_selections_scans_everything() {
        let buffer = Buffer::new("a  \nb  \n");
        assert_eq!(
            scan(&buffer, IssueKind::Trailing, ScanMode::Incremental),
            vec![Region::new(1, 3), Region::new(5, 7)]
        );
    }

    #[test]
    fn touched_lines_deduplicates() {
        let mut buffer = Buffer::new("one\ntwo\nthree\n");
        buffer.set_selections(vec![cursor(1), cursor(2), Region::new(5, 10)]);
        assert_eq!(
            touched_lines(&buffer),
            vec![Region::new(0, 3), Region::new(4, 7), Region::new(8, 13)]
        );
    }

    #[test]
    fn merge_supersedes_touched_regions() {
        let touched = [Region::new(10, 20)];
        let merged = merge(
            vec![Region::new(2, 4), Region::new(12, 14), Region::new(25, 27)],
            &touched,
            vec![Region::new(15, 17)],
        );
        assert_eq!(
            merged,
            vec![Region::new(2, 4), Region::new(15, 17), Region::new(25, 27)]
        );
    }

    #[test]
    fn merge_drops_regions_straddling_touched_lines() {
        // "ab  \n  \n" after Enter was pressed inside the run [2, 6)
        let touched = [Region::new(0, 4), Region::new(5, 7)];
        let merged = merge(
            vec![Region::new(2, 7)],
            &touched,
            vec![Region::new(2, 4), Region::new(5, 7)],
        );
        assert_eq!(merged, vec![Region::new(2, 4), Region::new(5, 7)]);
    }

    #[test]
    fn trailing_incremental_after_line_break_inside_run() {
        let mut buffer = Buffer::new("ab    \n");
        buffer.add_regions(IssueKind::Trailing, vec![Region::new(2, 6)]);
        buffer.apply_change(Region::new(4, 4), "\n");
        assert_eq!(buffer.get_regions(IssueKind::Trailing), vec![Region::new(2, 7)]);

        buffer.set_selections(vec![Region::new(4, 5)]);
        assert_eq!(
            scan_trailing_incremental(&buffer),
            vec![Region::new(2, 4), Region::new(5, 7)]
        );
    }

    #[test]
    fn extra_incremental_after_line_break_inside_run() {
        let mut buffer = Buffer::new("a    b\n");
        buffer.add_regions(IssueKind::ExtraSpaces, vec![Region::new(1, 5)]);
        buffer.apply_change(Region::new(3, 3), "\n");
        buffer.set_selections(vec![Region::new(3, 4)]);
        assert!(scan_extra_incremental(&buffer).is_empty());
    }
}
