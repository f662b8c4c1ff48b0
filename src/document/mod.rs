//! Document state and text utilities.
//!
//! This module provides:
//! - `LineIndex` for line lookups and byte offset <-> LSP position conversion
//! - `Buffer`, the in-memory text view the whitespace core runs against
//! - `DocumentStore` for document lifecycle management

mod buffer;
mod state;
mod text;

pub use buffer::{Buffer, Change};
pub use state::DocumentStore;
pub use text::LineIndex;
