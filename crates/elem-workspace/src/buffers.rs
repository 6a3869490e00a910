//! Shared storage for open documents.

use std::sync::Arc;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use dashmap::DashMap;

use crate::document::TextDocument;

/// Open documents keyed by absolute path.
///
/// Cloning shares the same storage, so the [`Workspace`](crate::Workspace)
/// and its [`WorkspaceFileSystem`](crate::WorkspaceFileSystem) always agree
/// on what is open.
#[derive(Clone, Debug, Default)]
pub struct Buffers {
    inner: Arc<DashMap<Utf8PathBuf, TextDocument>>,
}

impl Buffers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or replace a document.
    pub fn open(&self, path: Utf8PathBuf, document: TextDocument) {
        self.inner.insert(path, document);
    }

    pub fn close(&self, path: &Utf8Path) -> Option<TextDocument> {
        self.inner.remove(path).map(|(_, doc)| doc)
    }

    #[must_use]
    pub fn get(&self, path: &Utf8Path) -> Option<TextDocument> {
        self.inner.get(path).map(|entry| entry.clone())
    }

    #[must_use]
    pub fn contains(&self, path: &Utf8Path) -> bool {
        self.inner.contains_key(path)
    }

    /// Paths of every open document.
    #[must_use]
    pub fn paths(&self) -> Vec<Utf8PathBuf> {
        self.inner.iter().map(|entry| entry.key().clone()).collect()
    }
}
