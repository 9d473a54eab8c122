/// Filter string for the Open/Save dialogs.
///
/// FLTK format: "Description\tPattern\nDescription2\tPattern2". The dialogs
/// only narrow the listing; any path the user types is accepted.
pub fn text_files_filter() -> String {
    [
        "Text Files\t*.txt",
        "Python Files\t*.py",
        "All Files\t*",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_lists_text_python_and_all() {
        let filter = text_files_filter();
        let lines: Vec<&str> = filter.lines().collect();
        assert_eq!(lines, ["Text Files\t*.txt", "Python Files\t*.py", "All Files\t*"]);
    }
}
