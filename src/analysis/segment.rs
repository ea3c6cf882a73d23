//! Line segmentation of staged text.

use crate::models::Line;

/// Split staged text into non-blank lines, preserving input order.
///
/// Lines are split on `\n` (a trailing `\r` is dropped with it). Lines that are
/// empty or whitespace-only are skipped; the text of kept lines is not trimmed.
pub fn segment(text: &str) -> Vec<Line> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| Line::new(idx + 1, line))
        .collect()
}

/// Whether the staged text contains anything to analyze.
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_skips_blank_and_whitespace_lines() {
        let lines = segment("a\n\nb\n  \nc");
        assert_eq!(texts(&lines), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_keeps_original_line_numbers() {
        let lines = segment("a\n\nb\n  \nc");
        let numbers: Vec<usize> = lines.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 3, 5]);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(segment("").is_empty());
        assert!(segment("   \n\t\n").is_empty());
    }

    #[test]
    fn test_line_text_is_not_trimmed() {
        let lines = segment("  padded  \nnext");
        assert_eq!(texts(&lines), vec!["  padded  ", "next"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let lines = segment("first\r\n\r\nsecond\r\n");
        assert_eq!(texts(&lines), vec!["first", "second"]);
    }

    #[test]
    fn test_has_content() {
        assert!(!has_content(""));
        assert!(!has_content(" \n \t"));
        assert!(has_content("\n x \n"));
    }
}
