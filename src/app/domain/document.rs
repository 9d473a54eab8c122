use std::cell::Cell;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::app::infrastructure::surface::TextSurface;
use crate::app::services::text_ops::extract_filename;

pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

/// Relationship between a document's content and its backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// No backing path.
    Unbound,
    /// Content matches what was last loaded from or written to the path.
    Clean,
    /// Edited since the last load or save.
    Dirty,
}

pub struct Document {
    pub id: DocumentId,
    pub title: String,
    backing_path: Option<PathBuf>,
    surface: Box<dyn TextSurface>,
    clean_revision: u64,
    clean_hash: u64,
    /// Last revision compared against `clean_hash`, and whether it matched.
    checked: Cell<(u64, bool)>,
}

fn content_hash(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

impl Document {
    pub fn new(id: DocumentId, title: impl Into<String>, surface: Box<dyn TextSurface>) -> Self {
        let clean_revision = surface.revision();
        let clean_hash = content_hash(&surface.text());
        Self {
            id,
            title: title.into(),
            backing_path: None,
            surface,
            clean_revision,
            clean_hash,
            checked: Cell::new((clean_revision, true)),
        }
    }

    pub fn new_from_file(id: DocumentId, path: PathBuf, surface: Box<dyn TextSurface>) -> Self {
        let mut doc = Self::new(id, extract_filename(&path), surface);
        doc.backing_path = Some(path);
        doc
    }

    pub fn backing_path(&self) -> Option<&Path> {
        self.backing_path.as_deref()
    }

    pub fn surface(&self) -> &dyn TextSurface {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut dyn TextSurface {
        self.surface.as_mut()
    }

    pub fn content(&self) -> String {
        self.surface.text()
    }

    pub fn state(&self) -> DocumentState {
        if self.backing_path.is_none() {
            DocumentState::Unbound
        } else if self.matches_clean() {
            DocumentState::Clean
        } else {
            DocumentState::Dirty
        }
    }

    /// Edits that return the text to its saved form (undo, retyping) count
    /// as clean. The buffer is only rehashed when its revision moved.
    fn matches_clean(&self) -> bool {
        let revision = self.surface.revision();
        if revision == self.clean_revision {
            return true;
        }
        let (seen, matched) = self.checked.get();
        if seen == revision {
            return matched;
        }
        let matched = content_hash(&self.surface.text()) == self.clean_hash;
        self.checked.set((revision, matched));
        matched
    }

    pub fn is_dirty(&self) -> bool {
        self.state() == DocumentState::Dirty
    }

    /// Record that the current content now lives at `path`.
    pub fn bind(&mut self, path: PathBuf) {
        self.title = extract_filename(&path);
        self.backing_path = Some(path);
        self.mark_clean();
    }

    /// Forget the backing path; the content stays as an unsaved document.
    pub fn unbind(&mut self) {
        self.backing_path = None;
    }

    pub fn mark_clean(&mut self) {
        self.clean_revision = self.surface.revision();
        self.clean_hash = content_hash(&self.surface.text());
        self.checked.set((self.clean_revision, true));
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("backing_path", &self.backing_path)
            .field("state", &self.state())
            .finish()
    }
}
