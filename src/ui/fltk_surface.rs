//! [`TextSurface`] backed by an FLTK text buffer.
//!
//! Every document owns a `TextBuffer` and a parallel style buffer. One shared
//! `TextEditor` shows whichever document is active; `activate` rebinds it.

use std::cell::Cell;
use std::ffi::{c_char, c_int, c_void};
use std::rc::Rc;

use fltk::{
    app::Sender,
    prelude::*,
    text::{TextBuffer, TextEditor},
};

use crate::app::domain::messages::Message;
use crate::app::infrastructure::surface::{SurfaceFactory, TextSurface};
use crate::app::services::highlight::{HighlightStyle, Highlighter};
use crate::ui::theme::Palette;

unsafe extern "C" {
    fn Fl_Text_Buffer_text(buf: *mut c_void) -> *mut c_char;
    fn Fl_Text_Buffer_text_range(buf: *mut c_void, start: c_int, end: c_int) -> *mut c_char;
    fn free(ptr: *mut c_void);
}

/// Copy a `malloc()`'d C string into a `String` and free it.
///
/// fltk-rs's `TextBuffer::text()` never frees the copy FLTK hands back, so
/// reading a large buffer on every keystroke leaks the whole buffer each time.
///
/// # Safety
///
/// `ptr` must be null or a null-terminated string allocated with `malloc`.
unsafe fn take_c_string(ptr: *mut c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: non-null, null-terminated and malloc'd per the contract above.
    unsafe {
        let result = std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned();
        free(ptr as *mut c_void);
        result
    }
}

/// Whole buffer text without leaking the C copy.
pub fn buffer_text_no_leak(buf: &TextBuffer) -> String {
    // SAFETY: the buffer pointer is valid while `buf` lives, and
    // Fl_Text_Buffer_text returns a malloc'd copy.
    unsafe { take_c_string(Fl_Text_Buffer_text(buf.as_ptr() as *mut c_void)) }
}

/// Text in `start..end` without leaking the C copy.
fn buffer_range_no_leak(buf: &TextBuffer, start: i32, end: i32) -> String {
    // SAFETY: as above; FLTK clamps the range to the buffer.
    unsafe { take_c_string(Fl_Text_Buffer_text_range(buf.as_ptr() as *mut c_void, start, end)) }
}

/// The closure type stored behind the FFI `void* cbArg`.
type ModifyCb = dyn FnMut(i32, i32, i32, i32, *const c_char);

type ModifyFn = unsafe extern "C" fn(c_int, c_int, c_int, c_int, *const c_char, *mut c_void);

unsafe extern "C" {
    fn Fl_Text_Buffer_add_modify_callback(buf: *mut c_void, cb: Option<ModifyFn>, cb_arg: *mut c_void);
    fn Fl_Text_Buffer_remove_modify_callback(buf: *mut c_void, cb: Option<ModifyFn>, cb_arg: *mut c_void);
}

/// Module-level shim passed to FLTK as the C callback. Because it is one
/// fixed function pointer, `remove_modify_callback` can find it again by
/// pointer equality.
///
/// # Safety
///
/// `cb_arg` must be the pointer returned by `register_modify_callback` and
/// not yet freed by `FltkSurface::cleanup`.
unsafe extern "C" fn modify_shim(
    pos: c_int,
    n_inserted: c_int,
    n_deleted: c_int,
    n_restyled: c_int,
    deleted_text: *const c_char,
    cb_arg: *mut c_void,
) {
    if cb_arg.is_null() {
        tracing::warn!("modify_shim called with null callback argument");
        return;
    }
    // SAFETY: cb_arg is a live Box<Box<ModifyCb>> until cleanup() runs.
    unsafe {
        let cb: &mut Box<ModifyCb> = &mut *(cb_arg as *mut Box<ModifyCb>);
        cb(pos, n_inserted, n_deleted, n_restyled, deleted_text);
    }
}

/// Re-run the highlighter over the whole lines touched by `start..end`.
fn restyle_lines(buffer: &TextBuffer, style_buffer: &mut TextBuffer, highlighter: &Highlighter, start: i32, end: i32) {
    let line_start = buffer.line_start(start);
    let line_end = buffer.line_end(end);
    let text = buffer_range_no_leak(buffer, line_start, line_end);
    let styles = highlighter.style_string(&text);
    style_buffer.replace(line_start, line_end, &styles);
}

/// Box the closure and register it via FFI. Returns the `cbArg` pointer that
/// must be kept for cleanup.
fn register_modify_callback(
    buffer: &TextBuffer,
    style_buffer: &TextBuffer,
    highlighter: &Rc<Highlighter>,
    revision: &Rc<Cell<u64>>,
    sender: Sender<Message>,
) -> *mut c_void {
    let text_buf = buffer.clone();
    let mut style_buf = style_buffer.clone();
    let highlighter = highlighter.clone();
    let revision = revision.clone();
    let plain = HighlightStyle::Plain.style_char().to_string();

    let cb: Box<ModifyCb> = Box::new(move |pos: i32, inserted: i32, deleted: i32, _restyled: i32, _deleted_text: *const c_char| {
        if inserted == 0 && deleted == 0 {
            return;
        }
        revision.set(revision.get() + 1);
        // Keep the style buffer the same length as the text before restyling.
        if deleted > 0 {
            style_buf.remove(pos, pos + deleted);
        }
        if inserted > 0 {
            style_buf.insert(pos, &plain.repeat(inserted as usize));
        }
        restyle_lines(&text_buf, &mut style_buf, &highlighter, pos, pos + inserted);
        sender.send(Message::BufferModified);
    });

    let data = Box::into_raw(Box::new(cb)) as *mut c_void;

    // SAFETY: `data` stays valid until cleanup() removes the callback and
    // frees it; cleanup runs from Drop.
    unsafe {
        Fl_Text_Buffer_add_modify_callback(buffer.as_ptr() as *mut c_void, Some(modify_shim), data);
    }

    data
}

pub struct FltkSurface {
    buffer: TextBuffer,
    style_buffer: TextBuffer,
    editor: TextEditor,
    palette: Palette,
    font_size: u32,
    revision: Rc<Cell<u64>>,
    /// Heap closure handed to FLTK's modify callback. Freed in cleanup().
    modify_cb_data: *mut c_void,
}

impl FltkSurface {
    fn new(
        content: &str,
        font_size: u32,
        editor: TextEditor,
        palette: Palette,
        highlighter: &Rc<Highlighter>,
        sender: Sender<Message>,
    ) -> Self {
        let mut buffer = TextBuffer::default();
        let mut style_buffer = TextBuffer::default();
        let revision = Rc::new(Cell::new(0));

        // Loading must not be undoable, so history starts empty.
        buffer.can_undo(false);
        buffer.set_text(content);
        buffer.can_undo(true);
        style_buffer.set_text(&highlighter.style_string(content));

        let modify_cb_data = register_modify_callback(&buffer, &style_buffer, highlighter, &revision, sender);

        Self {
            buffer,
            style_buffer,
            editor,
            palette,
            font_size,
            revision,
            modify_cb_data,
        }
    }

    /// Whether the shared editor is currently showing this surface.
    fn is_bound(&self) -> bool {
        self.editor
            .buffer()
            .is_some_and(|b| unsafe { b.as_ptr() == self.buffer.as_ptr() })
    }

    fn apply_font(&mut self) {
        let table = self.palette.style_table(self.font_size);
        self.editor.set_highlight_data(self.style_buffer.clone(), table);
        self.editor.set_text_size(self.font_size as i32);
        self.editor.redraw();
    }

    /// Remove the FFI callback and free its closure. Idempotent.
    fn cleanup(&mut self) {
        if self.modify_cb_data.is_null() {
            return;
        }
        // SAFETY: remove the callback first so FLTK stops calling the shim
        // with this pointer, then free the closure. Same shim pointer as at
        // registration, so FLTK finds the entry.
        unsafe {
            Fl_Text_Buffer_remove_modify_callback(
                self.buffer.as_ptr() as *mut c_void,
                Some(modify_shim),
                self.modify_cb_data,
            );
            let _ = Box::from_raw(self.modify_cb_data as *mut Box<ModifyCb>);
        }
        self.modify_cb_data = std::ptr::null_mut();
    }
}

impl TextSurface for FltkSurface {
    fn text(&self) -> String {
        buffer_text_no_leak(&self.buffer)
    }

    fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
    }

    fn selected_text(&self) -> String {
        if self.buffer.selected() {
            self.buffer.selection_text()
        } else {
            String::new()
        }
    }

    fn select(&mut self, start: usize, end: usize) {
        let (start, end) = (start.min(end), start.max(end));
        if end > self.buffer.length() as usize {
            self.buffer.unselect();
        } else {
            self.buffer.select(start as i32, end as i32);
        }
    }

    fn select_all(&mut self) {
        let len = self.buffer.length();
        self.buffer.select(0, len);
    }

    fn insert(&mut self, text: &str) {
        if self.buffer.selected() {
            self.buffer.replace_selection(text);
        } else {
            let pos = self.editor.insert_position();
            self.buffer.insert(pos, text);
        }
    }

    fn cut(&mut self) {
        self.editor.cut();
    }

    fn copy(&mut self) {
        self.editor.copy();
    }

    fn paste(&mut self) {
        self.editor.paste();
    }

    fn undo(&mut self) {
        self.editor.undo();
    }

    fn redo(&mut self) {
        self.editor.redo();
    }

    fn font_size(&self) -> u32 {
        self.font_size
    }

    fn set_font_size(&mut self, size: u32) {
        self.font_size = size;
        if self.is_bound() {
            self.apply_font();
        }
    }

    fn revision(&self) -> u64 {
        self.revision.get()
    }

    fn activate(&mut self) {
        self.editor.set_buffer(self.buffer.clone());
        self.apply_font();
        self.editor.take_focus().ok();
    }
}

impl Drop for FltkSurface {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Creates one [`FltkSurface`] per document, all sharing the main editor.
pub struct FltkSurfaceFactory {
    editor: TextEditor,
    palette: Palette,
    highlighter: Rc<Highlighter>,
    sender: Sender<Message>,
}

impl FltkSurfaceFactory {
    pub fn new(editor: TextEditor, palette: Palette, sender: Sender<Message>) -> Self {
        Self {
            editor,
            palette,
            highlighter: Rc::new(Highlighter::new()),
            sender,
        }
    }
}

impl SurfaceFactory for FltkSurfaceFactory {
    fn create(&self, content: &str, font_size: u32) -> Box<dyn TextSurface> {
        Box::new(FltkSurface::new(
            content,
            font_size,
            self.editor.clone(),
            self.palette,
            &self.highlighter,
            self.sender,
        ))
    }
}
