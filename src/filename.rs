//! Output filename derivation.

/// Name used when a page has no usable title.
pub const DEFAULT_FILENAME: &str = "chat_export";

/// Extension appended to every exported document.
pub const EXTENSION: &str = "md";

/// Make a page title safe to use as a file stem.
///
/// Characters illegal on common filesystems (`/ \ ? % * : | " < > .`) and
/// C0/C1 control characters become `_`, the result is trimmed, an empty
/// result becomes `default`, and Windows device names (`CON`, `LPT1`, …)
/// get a `file_` prefix.
///
/// ```
/// use chatdown::filename::sanitize_with_default;
///
/// assert_eq!(sanitize_with_default("Q&A: plan?.md", "chat_export"), "Q&A_ plan__md");
/// assert_eq!(sanitize_with_default("  ", "chat_export"), "chat_export");
/// assert_eq!(sanitize_with_default("aux", "chat_export"), "file_aux");
/// ```
pub fn sanitize_with_default(name: &str, default: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if is_illegal(c) { '_' } else { c })
        .collect();

    let trimmed = replaced.trim();
    let name = if trimmed.is_empty() { default } else { trimmed };

    if is_reserved(name) {
        format!("file_{name}")
    } else {
        name.to_string()
    }
}

/// [`sanitize_with_default`] with [`DEFAULT_FILENAME`].
pub fn sanitize(name: &str) -> String {
    sanitize_with_default(name, DEFAULT_FILENAME)
}

/// Full output filename for a page title: sanitized stem plus extension.
pub fn for_title(title: Option<&str>, default: &str) -> String {
    let stem = sanitize_with_default(title.unwrap_or(default), default);
    format!("{stem}.{EXTENSION}")
}

fn is_illegal(c: char) -> bool {
    matches!(c, '/' | '\\' | '?' | '%' | '*' | ':' | '|' | '"' | '<' | '>' | '.')
        || matches!(c, '\u{0}'..='\u{1f}' | '\u{80}'..='\u{9f}')
}

fn is_reserved(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    match lower.as_str() {
        "con" | "prn" | "aux" | "nul" => true,
        _ => match lower.as_bytes() {
            [a, b, c, digit] => {
                (&[*a, *b, *c] == b"com" || &[*a, *b, *c] == b"lpt")
                    && (b'1'..=b'9').contains(digit)
            }
            _ => false,
        },
    }
}
