//! The host surface the whitespace core runs against.
//!
//! Everything the core needs from an editor goes through [`TextView`]:
//! reading text, searching it, classifying scopes, storing highlighted
//! region sets and applying edits. Edits require an [`Edit`] token, which
//! only the host hands out for the duration of one transaction.

use std::time::Duration;

use regex::Regex;

use super::kind::IssueKind;
use super::region::Region;
use super::scanner::{self, ScanMode};

/// Proof that the host has opened an edit transaction.
///
/// All mutations made with the same token are applied as one undoable unit.
#[derive(Debug)]
pub struct Edit {
    id: u64,
}

impl Edit {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// A host-owned document as seen by the whitespace core.
pub trait TextView {
    /// Path of the backing file. `None` for transient views (find panels,
    /// output panes) which are never inspected.
    fn file_name(&self) -> Option<&str>;

    /// Syntax or language identifier, possibly path-like.
    fn syntax(&self) -> Option<&str>;

    /// Document length in bytes.
    fn size(&self) -> usize;

    /// Text covered by `region`, clamped to the document.
    fn substr(&self, region: Region) -> &str;

    /// The final character of the document, if any.
    fn last_char(&self) -> Option<char>;

    /// Current selections. Cursors are empty regions.
    fn selections(&self) -> Vec<Region>;

    /// Every line intersected by `region`, newline excluded.
    fn lines(&self, region: Region) -> Vec<Region>;

    /// First match of `pattern` fully inside `bounds`.
    fn find(&self, pattern: &Regex, bounds: Region) -> Option<Region>;

    /// All non-overlapping matches of `pattern` in the document.
    fn find_all(&self, pattern: &Regex) -> Vec<Region>;

    /// True if `offset` lies inside a syntax scope matching `scope`
    /// (e.g. `"string.quoted"`).
    fn in_scope(&self, offset: usize, scope: &str) -> bool;

    /// Replace the highlighted region set for `kind`.
    fn add_regions(&mut self, kind: IssueKind, regions: Vec<Region>);

    /// The highlighted region set for `kind`, sorted by start offset.
    fn get_regions(&self, kind: IssueKind) -> Vec<Region>;

    fn erase_regions(&mut self, kind: IssueKind);

    fn insert(&mut self, edit: &Edit, offset: usize, text: &str);

    fn replace(&mut self, edit: &Edit, region: Region, text: &str);

    fn erase(&mut self, edit: &Edit, region: Region) {
        self.replace(edit, region, "");
    }
}

/// A scan handed to the host's event loop instead of running inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredScan {
    pub kind: IssueKind,
    pub mode: ScanMode,
}

impl DeferredScan {
    /// Scan the view as it is now and replace the kind's region set.
    pub fn run<V: TextView + ?Sized>(self, view: &mut V) {
        let regions = scanner::scan(view, self.kind, self.mode);
        super::annotate(view, self.kind, regions);
    }
}

/// Deferred execution on the host's single event loop.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, scan: DeferredScan);
}

/// Collects scans for the caller to run later. Delays are ignored.
impl Scheduler for Vec<DeferredScan> {
    fn schedule(&mut self, _delay: Duration, scan: DeferredScan) {
        self.push(scan);
    }
}
