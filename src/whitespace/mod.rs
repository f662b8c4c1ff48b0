//! Whitespace issue detection, highlighting and fixing.
//!
//! This module provides:
//! - `IssueKind` and `Region` for naming and locating issues
//! - `TextView`, `Edit` and `Scheduler`, the host surface the core runs on
//! - `scanner` with full and incremental detectors
//! - `fixer` with the reverse-order edit passes
//! - `WhiteSpaces`, which ties lifecycle triggers to the policy gate

pub mod fixer;
mod kind;
mod region;
pub mod scanner;
mod view;

use std::time::Duration;

use tracing::debug;

pub use kind::IssueKind;
pub use region::Region;
pub use scanner::ScanMode;
pub use view::{DeferredScan, Edit, Scheduler, TextView};

use crate::settings::Policy;

/// Delay before the extra-spaces and trailing scans run after a trigger.
pub const DEFERRED_SCAN_DELAY: Duration = Duration::from_millis(10);

/// Replace the highlighted region set for `kind`. An empty set clears it.
pub fn annotate<V: TextView + ?Sized>(view: &mut V, kind: IssueKind, regions: Vec<Region>) {
    debug!(kind = kind.name(), count = regions.len(), "annotating regions");
    view.add_regions(kind, regions);
}

/// Entry points for display and fix requests against one view.
#[derive(Debug, Clone, Copy)]
pub struct WhiteSpaces<'a> {
    policy: &'a Policy,
}

impl<'a> WhiteSpaces<'a> {
    pub fn new(policy: &'a Policy) -> Self {
        Self { policy }
    }

    /// Scan the view and annotate what is found.
    ///
    /// With `kinds = None` the request is event-driven: the view must pass the
    /// syntax allowlist and the kinds come from `auto_display`. An explicit
    /// list skips the allowlist. The eof scan runs immediately; the other two
    /// are handed to `scheduler`.
    pub fn display<V, S>(
        &self,
        view: &mut V,
        scheduler: &mut S,
        kinds: Option<&[IssueKind]>,
        mode: ScanMode,
    ) where
        V: TextView + ?Sized,
        S: Scheduler + ?Sized,
    {
        if view.file_name().is_none() {
            debug!("skipping display for view without a file");
            return;
        }

        let Some(kinds) = self.resolve(view, kinds, &self.policy.auto_display) else {
            return;
        };

        for kind in kinds {
            match kind {
                IssueKind::Eof => {
                    let regions = scanner::scan_eof(view);
                    annotate(view, kind, regions);
                }
                kind => scheduler.schedule(DEFERRED_SCAN_DELAY, DeferredScan { kind, mode }),
            }
        }
    }

    /// Remove annotated issues inside the host transaction `edit`.
    ///
    /// With `kinds = None` the request comes from a save: the view must pass
    /// the syntax allowlist and the kinds come from `fix_on_save`.
    pub fn fix<V>(&self, view: &mut V, edit: &Edit, kinds: Option<&[IssueKind]>)
    where
        V: TextView + ?Sized,
    {
        let Some(kinds) = self.resolve(view, kinds, &self.policy.fix_on_save) else {
            return;
        };

        for kind in kinds {
            fixer::fix_kind(view, edit, kind);
        }
    }

    /// The kinds to process, in canonical order, or `None` if an implicit
    /// request hits an ineligible view.
    fn resolve<V: TextView + ?Sized>(
        &self,
        view: &V,
        explicit: Option<&[IssueKind]>,
        configured: &[IssueKind],
    ) -> Option<Vec<IssueKind>> {
        let requested = match explicit {
            Some(kinds) => kinds,
            None => {
                if !self.policy.is_eligible(view.syntax()) {
                    debug!(syntax = ?view.syntax(), "syntax not in allowlist");
                    return None;
                }
                configured
            }
        };

        Some(
            IssueKind::ALL
                .into_iter()
                .filter(|kind| requested.contains(kind))
                .collect(),
        )
    }
}
