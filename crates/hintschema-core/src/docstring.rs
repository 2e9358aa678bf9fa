/// Extract the summary line of a documentation string.
///
/// Returns the first non-blank line with surrounding whitespace removed, or
/// `None` when the documentation is missing or blank.
pub fn doc_summary(doc: Option<&str>) -> Option<String> {
    doc?.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        assert_eq!(doc_summary(Some("Data class")), Some("Data class".to_string()));
    }

    #[test]
    fn test_indented_multi_line() {
        let doc = "\n    Compute the total.\n\n    Longer explanation here.\n";
        assert_eq!(doc_summary(Some(doc)), Some("Compute the total.".to_string()));
    }

    #[test]
    fn test_missing_or_blank() {
        assert_eq!(doc_summary(None), None);
        assert_eq!(doc_summary(Some("  \n\t\n")), None);
    }
}
