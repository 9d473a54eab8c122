use std::path::Path;

/// Extract filename from a file path
///
/// Returns the filename component of a path, or "Unknown" if it can't be extracted.
pub fn extract_filename(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Text an outgoing command should act on: the selection when there is one,
/// otherwise the whole document.
pub fn selection_or_all<'a>(selection: &'a str, content: &'a str) -> &'a str {
    if selection.is_empty() { content } else { selection }
}
