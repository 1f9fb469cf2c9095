/*
 * normalize.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Whitespace cleanup for rendered output.
//!
//! Removing directives leaves ragged indentation and blank lines behind.
//! [`normalize`] collapses them so generated text reads as if it had been
//! written by hand.

use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of spaces and tabs.
static HORIZONTAL_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Whitespace (blank lines included) ending at a line break.
static BEFORE_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\n").unwrap());

/// A line break followed by whitespace (blank lines included).
static AFTER_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s+").unwrap());

/// Normalize whitespace in rendered text.
///
/// 1. Collapse runs of spaces/tabs to a single space.
/// 2. Drop whitespace before each line break, and blank lines with it.
/// 3. Drop whitespace after each line break.
/// 4. Trim the result.
///
/// Normalizing already-normalized text returns it unchanged.
pub fn normalize(text: &str) -> String {
    let text = HORIZONTAL_RUN.replace_all(text, " ");
    let text = BEFORE_NEWLINE.replace_all(&text, "\n");
    let text = AFTER_NEWLINE.replace_all(&text, "\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_collapses_horizontal_runs() {
        assert_eq!(normalize("SELECT  *\t\tFROM   t"), "SELECT * FROM t");
    }

    #[test]
    fn test_strips_line_edges() {
        assert_eq!(normalize("a   \n    b\t\n\tc"), "a\nb\nc");
    }

    #[test]
    fn test_removes_blank_lines() {
        let text = "SELECT *\n    \n\n  FROM t\n   \n  WHERE 1=1\n";
        assert_eq!(normalize(text), "SELECT *\nFROM t\nWHERE 1=1");
    }

    #[test]
    fn test_trims_whole_result() {
        assert_eq!(normalize("\n\n  x  \n\n"), "x");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(normalize("a \r\n  b"), "a\nb");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(text in "[a-z \t\r\n]{0,64}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once.clone());
        }
    }
}
