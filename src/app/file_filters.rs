use std::path::PathBuf;

/// Filter pattern for HTML documents, used by both the open and save
/// dialogs.
///
/// FLTK accepts these filter formats:
/// - Simple wildcard: "*.html"
/// - Multiple wildcards: "*.{html,htm}"
/// - With description (optional): "HTML Files\t*.html"
///
/// For maximum compatibility we use the simple format without description;
/// FLTK adds an "All Files (*)" option itself.
pub fn html_filter() -> String {
    "*.{html,htm}".to_string()
}

/// Append `.html` to an extensionless save-as name. A name with any
/// extension, HTML or not, is kept as the user typed it.
pub fn ensure_html_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.with_extension("html")
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_lists_both_extensions() {
        let filter = html_filter();
        assert!(filter.contains("html"));
        assert!(filter.contains("htm"));
    }

    #[test]
    fn test_extensionless_name_gets_html() {
        assert_eq!(
            ensure_html_extension(PathBuf::from("notes")),
            PathBuf::from("notes.html")
        );
        assert_eq!(
            ensure_html_extension(PathBuf::from("notes.htm")),
            PathBuf::from("notes.htm")
        );
        assert_eq!(
            ensure_html_extension(PathBuf::from("notes.txt")),
            PathBuf::from("notes.txt")
        );
    }
}
