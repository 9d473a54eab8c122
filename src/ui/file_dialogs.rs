use std::path::PathBuf;

use fltk::dialog::{FileDialogType, NativeFileChooser};

use crate::app::services::file_filters::text_files_filter;

fn run_native_dialog(kind: FileDialogType, title: &str) -> Option<PathBuf> {
    let mut nfc = NativeFileChooser::new(kind);
    nfc.set_title(title);
    nfc.set_filter(&text_files_filter());
    nfc.show(); // blocks until close
    let filename = nfc.filename();
    if filename.as_os_str().is_empty() {
        None
    } else {
        Some(filename)
    }
}

pub fn native_open_dialog() -> Option<PathBuf> {
    run_native_dialog(FileDialogType::BrowseFile, "Open File")
}

pub fn native_save_dialog() -> Option<PathBuf> {
    run_native_dialog(FileDialogType::BrowseSaveFile, "Save File")
}
