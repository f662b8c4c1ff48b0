//! In-memory text buffer implementing the whitespace host surface.

use std::collections::HashMap;
use std::ops::Range;

use regex::Regex;

use crate::whitespace::{Edit, IssueKind, Region, TextView};

use super::text::LineIndex;

/// One replacement applied to a buffer, in the coordinates it had when it
/// was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub region: Region,
    pub text: String,
}

/// An editable document with highlighted region sets.
///
/// Region sets track edits the way an editor's highlights do: regions after
/// an edit shift with it, regions collapsed to nothing by an edit are
/// dropped. They are never re-scanned by the buffer itself.
#[derive(Debug, Clone)]
pub struct Buffer {
    line_index: LineIndex,
    file_name: Option<String>,
    syntax: Option<String>,
    selections: Vec<Region>,
    annotations: HashMap<IssueKind, Vec<Region>>,
    /// Byte ranges of quoted string literals, quotes included.
    strings: Vec<Range<usize>>,
    /// Changes made by the open (or most recent) transaction.
    log: Vec<Change>,
    transactions: u64,
    version: i32,
}

impl Buffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let strings = find_string_ranges(&text);
        Self {
            line_index: LineIndex::new(text),
            file_name: None,
            syntax: None,
            selections: Vec::new(),
            annotations: HashMap::new(),
            strings,
            log: Vec::new(),
            transactions: 0,
            version: 0,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_syntax(mut self, syntax: impl Into<String>) -> Self {
        self.syntax = Some(syntax.into());
        self
    }

    pub fn with_version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    pub fn text(&self) -> &str {
        self.line_index.source()
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Document version from the client.
    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    pub fn set_selections(&mut self, selections: Vec<Region>) {
        self.selections = selections;
    }

    /// All non-empty region sets, in kind order.
    pub fn annotations(&self) -> Vec<(IssueKind, Vec<Region>)> {
        IssueKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get_regions(kind)))
            .filter(|(_, regions)| !regions.is_empty())
            .collect()
    }

    /// Replace `region` with `text` outside of any fix transaction, e.g. to
    /// mirror a change the user made in the editor.
    pub fn apply_change(&mut self, region: Region, text: &str) {
        let region = self.clamp(region);
        let start = region.start;
        let old_end = region.end;
        let new_len = text.len();

        let mut source = std::mem::replace(&mut self.line_index, LineIndex::new(String::new()))
            .into_source();
        source.replace_range(region.as_range(), text);
        self.strings = find_string_ranges(&source);
        self.line_index = LineIndex::new(source);

        for regions in self.annotations.values_mut() {
            *regions = regions
                .iter()
                .map(|r| {
                    Region::new(
                        shift_offset(r.start, start, old_end, new_len),
                        shift_offset(r.end, start, old_end, new_len),
                    )
                })
                .filter(|r| !r.is_empty())
                .collect();
        }
        self.selections = self
            .selections
            .iter()
            .map(|r| {
                Region::new(
                    shift_offset(r.start, start, old_end, new_len),
                    shift_offset(r.end, start, old_end, new_len),
                )
            })
            .collect();
    }

    /// Run `f` as one edit transaction and return its result.
    pub fn transaction<R>(&mut self, f: impl FnOnce(&mut Self, &Edit) -> R) -> R {
        self.transactions += 1;
        self.log.clear();
        let edit = Edit::new(self.transactions);
        f(self, &edit)
    }

    /// Changes applied by the open or most recent transaction, in order.
    pub fn edit_log(&self) -> &[Change] {
        &self.log
    }

    /// Number of transactions run on this buffer.
    pub fn transaction_count(&self) -> u64 {
        self.transactions
    }

    fn clamp(&self, region: Region) -> Region {
        let size = self.size();
        Region::new(region.start.min(size), region.end.min(size))
    }

    fn record(&mut self, edit: &Edit, region: Region, text: &str) {
        debug_assert_eq!(edit.id(), self.transactions, "edit token from another transaction");
        self.log.push(Change {
            region,
            text: text.to_string(),
        });
        self.apply_change(region, text);
    }
}

impl TextView for Buffer {
    fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    fn syntax(&self) -> Option<&str> {
        self.syntax.as_deref()
    }

    fn size(&self) -> usize {
        self.text().len()
    }

    fn substr(&self, region: Region) -> &str {
        let region = self.clamp(region);
        self.text().get(region.as_range()).unwrap_or("")
    }

    fn last_char(&self) -> Option<char> {
        self.text().chars().next_back()
    }

    fn selections(&self) -> Vec<Region> {
        self.selections.clone()
    }

    fn lines(&self, region: Region) -> Vec<Region> {
        let region = self.clamp(region);
        let first = self.line_index.line_of(region.start);
        let last = self.line_index.line_of(region.end);
        (first..=last)
            .map(|line| Region::from(self.line_index.line_range(line)))
            .collect()
    }

    fn find(&self, pattern: &Regex, bounds: Region) -> Option<Region> {
        let bounds = self.clamp(bounds);
        let haystack = self.text().get(bounds.as_range())?;
        pattern
            .find(haystack)
            .map(|m| Region::new(bounds.start + m.start(), bounds.start + m.end()))
    }

    fn find_all(&self, pattern: &Regex) -> Vec<Region> {
        pattern
            .find_iter(self.text())
            .map(|m| Region::new(m.start(), m.end()))
            .collect()
    }

    fn in_scope(&self, offset: usize, scope: &str) -> bool {
        if !scope.starts_with("string") {
            return false;
        }
        self.strings.iter().any(|range| range.contains(&offset))
    }

    fn add_regions(&mut self, kind: IssueKind, mut regions: Vec<Region>) {
        regions.sort();
        self.annotations.insert(kind, regions);
    }

    fn get_regions(&self, kind: IssueKind) -> Vec<Region> {
        self.annotations.get(&kind).cloned().unwrap_or_default()
    }

    fn erase_regions(&mut self, kind: IssueKind) {
        self.annotations.remove(&kind);
    }

    fn insert(&mut self, edit: &Edit, offset: usize, text: &str) {
        self.record(edit, Region::new(offset, offset), text);
    }

    fn replace(&mut self, edit: &Edit, region: Region, text: &str) {
        self.record(edit, region, text);
    }
}

/// Where an offset lands after `[start, old_end)` is replaced by `new_len`
/// bytes. Offsets inside the replaced range move to its new end.
fn shift_offset(offset: usize, start: usize, old_end: usize, new_len: usize) -> usize {
    if offset <= start {
        offset
    } else if offset >= old_end {
        offset - old_end + start + new_len
    } else {
        start + new_len
    }
}

/// Find byte ranges of single- and double-quoted string literals.
///
/// Strings do not span lines; a quote left open at the end of a line is not
/// treated as a string (apostrophes in prose).
fn find_string_ranges(source: &str) -> Vec<Range<usize>> {
    let bytes = source.as_bytes();
    let mut ranges = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let quote = bytes[pos];
        if quote != b'"' && quote != b'\'' {
            pos += 1;
            continue;
        }

        let start = pos;
        pos += 1;
        let mut closed = false;
        while pos < bytes.len() && bytes[pos] != b'\n' {
            match bytes[pos] {
                b'\\' => pos += 2,
                c if c == quote => {
                    pos += 1;
                    closed = true;
                    break;
                }
                _ => pos += 1,
            }
        }

        if closed {
            ranges.push(start..pos);
        } else {
            pos = start + 1;
        }
    }

    ranges
}
