use std::path::{Path, PathBuf};

use crate::app::domain::document::{Document, DocumentId};
use crate::app::infrastructure::surface::TextSurface;

/// Ordered set of open documents plus the active one.
///
/// Documents are addressed by [`DocumentId`], never by position, so removing
/// a tab cannot shift another tab's file binding.
pub struct TabManager {
    documents: Vec<Document>,
    active_id: Option<DocumentId>,
    next_id: u64,
}

impl TabManager {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            active_id: None,
            next_id: 1,
        }
    }

    fn next_document_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Make `id` active and let its surface take over the editor.
    fn activate(&mut self, id: DocumentId) {
        self.active_id = Some(id);
        if let Some(doc) = self.doc_by_id_mut(id) {
            doc.surface_mut().activate();
        }
    }

    pub fn add(&mut self, title: &str, surface: Box<dyn TextSurface>) -> DocumentId {
        let id = self.next_document_id();
        self.documents.push(Document::new(id, title, surface));
        self.activate(id);
        id
    }

    pub fn add_from_file(&mut self, path: PathBuf, surface: Box<dyn TextSurface>) -> DocumentId {
        let id = self.next_document_id();
        self.documents.push(Document::new_from_file(id, path, surface));
        self.activate(id);
        id
    }

    pub fn active_doc(&self) -> Option<&Document> {
        let active_id = self.active_id?;
        self.doc_by_id(active_id)
    }

    pub fn active_doc_mut(&mut self) -> Option<&mut Document> {
        let active_id = self.active_id?;
        self.doc_by_id_mut(active_id)
    }

    pub fn set_active(&mut self, id: DocumentId) {
        if self.documents.iter().any(|d| d.id == id) {
            self.activate(id);
        }
    }

    /// Remove a document by id. Activates the next tab, or the previous one
    /// when the last tab is removed.
    pub fn remove(&mut self, id: DocumentId) {
        let idx = match self.documents.iter().position(|d| d.id == id) {
            Some(i) => i,
            None => return,
        };

        // Switch before dropping so the editor never shows a freed buffer.
        if self.active_id == Some(id) {
            let neighbor = if idx + 1 < self.documents.len() {
                Some(idx + 1)
            } else {
                idx.checked_sub(1)
            };
            match neighbor {
                Some(n) => {
                    let new_id = self.documents[n].id;
                    self.activate(new_id);
                }
                None => self.active_id = None,
            }
        }
        self.documents.remove(idx);
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active_id
    }

    /// Find a document by file path
    pub fn find_by_path(&self, path: &Path) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|d| d.backing_path() == Some(path))
            .map(|d| d.id)
    }

    pub fn doc_by_id(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn doc_by_id_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}
