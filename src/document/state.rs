//! Document state management for the whitespace LSP.

use dashmap::DashMap;
use tower_lsp::lsp_types::Url;

use super::buffer::Buffer;

/// Thread-safe storage for open documents.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Url, Buffer>,
}

impl DocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Open a document, replacing any buffer already stored for the URI.
    pub fn open(&self, uri: Url, buffer: Buffer) {
        self.documents.insert(uri, buffer);
    }

    /// Close a document.
    pub fn close(&self, uri: &Url) {
        self.documents.remove(uri);
    }

    /// Run `f` with exclusive access to a document's buffer.
    ///
    /// Returns `None` if the document is not open.
    pub fn with_document<R>(&self, uri: &Url, f: impl FnOnce(&mut Buffer) -> R) -> Option<R> {
        self.documents.get_mut(uri).map(|mut entry| f(entry.value_mut()))
    }

    /// Get a copy of a document's buffer.
    pub fn get(&self, uri: &Url) -> Option<Buffer> {
        self.documents.get(uri).map(|entry| entry.value().clone())
    }
}
