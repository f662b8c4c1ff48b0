//! LSP protocol feature implementations.
//!
//! This module provides:
//! - Diagnostics conversion from annotated region sets
//! - Minimal text edits for fixes
//! - Content change mirroring for incremental sync
//! - Command names and argument parsing

mod commands;
mod diagnostics;
mod edits;
mod sync;

pub use commands::{all_commands, parse_arguments, CommandArgs, DISPLAY_COMMAND, FIX_COMMAND};
pub use diagnostics::{to_diagnostics, DIAGNOSTIC_SOURCE};
pub use edits::minimal_edit;
pub use sync::apply_content_changes;
