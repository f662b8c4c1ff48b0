//! Edits that remove annotated whitespace issues.
//!
//! Fixes only act on regions already annotated on the view; they never scan.
//! Within one kind, regions are processed from the end of the document
//! backwards so that each edit leaves the offsets of the regions still to be
//! processed untouched.

use super::kind::IssueKind;
use super::view::{Edit, TextView};

/// Apply the fix for `kind`. A kind with no annotated regions is a no-op.
pub fn fix_kind<V: TextView + ?Sized>(view: &mut V, edit: &Edit, kind: IssueKind) {
    match kind {
        IssueKind::Eof => fix_eof(view, edit),
        IssueKind::ExtraSpaces => fix_extra(view, edit),
        IssueKind::Trailing => fix_trailing(view, edit),
    }
}

/// Append a newline if the eof issue is annotated, then clear it.
pub fn fix_eof<V: TextView + ?Sized>(view: &mut V, edit: &Edit) {
    if view.get_regions(IssueKind::Eof).is_empty() {
        return;
    }
    let end = view.size();
    view.insert(edit, end, "\n");
    view.erase_regions(IssueKind::Eof);
}

/// Collapse each annotated run of spaces to a single space.
pub fn fix_extra<V: TextView + ?Sized>(view: &mut V, edit: &Edit) {
    let mut regions = view.get_regions(IssueKind::ExtraSpaces);
    regions.sort_by(|a, b| b.cmp(a));
    for region in regions {
        view.replace(edit, region, " ");
    }
}

/// Delete each annotated trailing run.
pub fn fix_trailing<V: TextView + ?Sized>(view: &mut V, edit: &Edit) {
    let mut regions = view.get_regions(IssueKind::Trailing);
    regions.sort_by(|a, b| b.cmp(a));
    for region in regions {
        view.erase(edit, region);
    }
}
