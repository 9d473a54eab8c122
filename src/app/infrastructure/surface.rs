//! The editing surface a document's text lives in.
//!
//! The session never touches a widget directly: it talks to a
//! [`TextSurface`], created through a [`SurfaceFactory`]. The FLTK front end
//! supplies a widget-backed surface; [`MemorySurface`] is the headless one.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

pub trait TextSurface {
    fn text(&self) -> String;
    /// Replace the whole content. Undoable.
    fn set_text(&mut self, text: &str);
    /// Current selection, or an empty string when nothing is selected.
    fn selected_text(&self) -> String;
    /// Select the byte range `start..end`. Out-of-range or non-boundary
    /// offsets clear the selection instead.
    fn select(&mut self, start: usize, end: usize);
    fn select_all(&mut self);
    /// Insert at the cursor, replacing the selection if there is one.
    fn insert(&mut self, text: &str);
    fn cut(&mut self);
    fn copy(&mut self);
    fn paste(&mut self);
    fn undo(&mut self);
    fn redo(&mut self);
    fn font_size(&self) -> u32;
    fn set_font_size(&mut self, size: u32);
    /// Increases on every content change; compared against the revision
    /// recorded at load/save to decide dirtiness.
    fn revision(&self) -> u64;
    /// Called when the owning document becomes the active one. Widget-backed
    /// surfaces bind themselves to the shared editor here.
    fn activate(&mut self) {}
}

pub trait SurfaceFactory {
    fn create(&self, content: &str, font_size: u32) -> Box<dyn TextSurface>;
}

/// Clipboard shared by every surface of one session.
#[derive(Debug, Clone, Default)]
pub struct Clipboard(Rc<RefCell<String>>);

impl Clipboard {
    pub fn get(&self) -> String {
        self.0.borrow().clone()
    }

    pub fn set(&self, text: &str) {
        *self.0.borrow_mut() = text.to_string();
    }
}

/// In-memory surface with snapshot undo/redo.
#[derive(Debug)]
pub struct MemorySurface {
    text: String,
    selection: Option<Range<usize>>,
    cursor: usize,
    undo_stack: Vec<String>,
    redo_stack: Vec<String>,
    clipboard: Clipboard,
    font_size: u32,
    revision: u64,
}

impl MemorySurface {
    pub fn new(content: &str, font_size: u32, clipboard: Clipboard) -> Self {
        Self {
            text: content.to_string(),
            selection: None,
            cursor: content.len(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            clipboard,
            font_size,
            revision: 0,
        }
    }

    fn selection_range(&self) -> Option<Range<usize>> {
        self.selection.clone().filter(|r| !r.is_empty())
    }

    /// Apply a content change, recording the previous text for undo.
    fn edit(&mut self, f: impl FnOnce(&mut String) -> usize) {
        let before = self.text.clone();
        self.cursor = f(&mut self.text);
        self.selection = None;
        if self.text != before {
            self.undo_stack.push(before);
            self.redo_stack.clear();
            self.revision += 1;
        }
    }

    fn restore(&mut self, text: String) {
        self.text = text;
        self.selection = None;
        self.cursor = self.text.len();
        self.revision += 1;
    }
}

impl TextSurface for MemorySurface {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.edit(|buf| {
            buf.clear();
            buf.push_str(text);
            buf.len()
        });
    }

    fn selected_text(&self) -> String {
        self.selection_range()
            .map(|r| self.text[r].to_string())
            .unwrap_or_default()
    }

    fn select(&mut self, start: usize, end: usize) {
        let (start, end) = (start.min(end), start.max(end));
        if end <= self.text.len()
            && self.text.is_char_boundary(start)
            && self.text.is_char_boundary(end)
        {
            self.selection = Some(start..end);
            self.cursor = end;
        } else {
            self.selection = None;
        }
    }

    fn select_all(&mut self) {
        self.selection = Some(0..self.text.len());
        self.cursor = self.text.len();
    }

    fn insert(&mut self, text: &str) {
        let range = self.selection_range().unwrap_or(self.cursor..self.cursor);
        self.edit(|buf| {
            buf.replace_range(range.clone(), text);
            range.start + text.len()
        });
    }

    fn cut(&mut self) {
        if let Some(range) = self.selection_range() {
            self.clipboard.set(&self.text[range.clone()]);
            self.edit(|buf| {
                buf.replace_range(range.clone(), "");
                range.start
            });
        }
    }

    fn copy(&mut self) {
        if let Some(range) = self.selection_range() {
            self.clipboard.set(&self.text[range]);
        }
    }

    fn paste(&mut self) {
        let pasted = self.clipboard.get();
        if !pasted.is_empty() {
            self.insert(&pasted);
        }
    }

    fn undo(&mut self) {
        if let Some(previous) = self.undo_stack.pop() {
            let current = std::mem::take(&mut self.text);
            self.redo_stack.push(current);
            self.restore(previous);
        }
    }

    fn redo(&mut self) {
        if let Some(next) = self.redo_stack.pop() {
            let current = std::mem::take(&mut self.text);
            self.undo_stack.push(current);
            self.restore(next);
        }
    }

    fn font_size(&self) -> u32 {
        self.font_size
    }

    fn set_font_size(&mut self, size: u32) {
        self.font_size = size;
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

/// Factory producing [`MemorySurface`]s that share one clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemorySurfaceFactory {
    clipboard: Clipboard,
}

impl MemorySurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SurfaceFactory for MemorySurfaceFactory {
    fn create(&self, content: &str, font_size: u32) -> Box<dyn TextSurface> {
        Box::new(MemorySurface::new(content, font_size, self.clipboard.clone()))
    }
}
