//! Whitespace normalization applied to converted text.

use std::sync::LazyLock;

use regex::Regex;

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("static regex is valid"));

/// Normalize converted text for output.
///
/// Non-breaking spaces become spaces, CRLF becomes LF, any run of three or
/// more newlines collapses to exactly two, and the result is trimmed.
/// CRLF replacement is a single pass, so `\r\r\n` keeps one `\r`; on text
/// without carriage returns the function is idempotent.
///
/// ```
/// use chatdown::markdown::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("\r\n a\u{a0}b\n\n\n\nc \n"), "a b\n\nc");
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    let text = text.replace('\u{a0}', " ").replace("\r\n", "\n");
    BLANK_RUNS.replace_all(&text, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_collapses_blank_runs() {
        assert_eq!(normalize_whitespace("a\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_whitespace("a\n\nb"), "a\n\nb");
        assert_eq!(normalize_whitespace("a\n\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_crlf_runs_collapse_after_conversion() {
        assert_eq!(normalize_whitespace("a\r\n\r\n\r\nb"), "a\n\nb");
    }

    #[test]
    fn test_trims_edges() {
        assert_eq!(normalize_whitespace("\n\n  hello \u{a0}\n"), "hello");
        assert_eq!(normalize_whitespace(""), "");
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(s in "[ a-z\n\u{a0}\t]{0,64}") {
            let once = normalize_whitespace(&s);
            prop_assert_eq!(normalize_whitespace(&once), once.clone());
        }

        #[test]
        fn prop_no_triple_newlines_remain(s in "[a\n\r]{0,64}") {
            prop_assert!(!normalize_whitespace(&s).contains("\n\n\n"));
        }
    }
}
