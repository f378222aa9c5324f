//! Text decoding helpers for saved pages.

use std::borrow::Cow;

/// Decode saved page bytes.
///
/// Valid UTF-8 (with or without a BOM) is borrowed as is. Anything else is
/// decoded with the `<meta charset>` label when it names a known encoding,
/// else as Windows-1252, which is what browsers assume for unlabeled pages.
pub fn decode_text<'a>(bytes: &'a [u8], hint: Option<&str>) -> Cow<'a, str> {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return text;
    }

    let encoding = hint
        .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
        .unwrap_or(encoding_rs::WINDOWS_1252);
    tracing::debug!(encoding = encoding.name(), "page is not valid UTF-8");
    encoding.decode(bytes).0
}

/// Extract the charset label from a `<meta>` tag near the top of a page.
///
/// Matches both `<meta charset="...">` and the `http-equiv` form
/// `content="text/html; charset=..."`. Only the first 1024 bytes are
/// checked, as in the HTML prescan.
pub fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(1024);
    let prefix = &bytes[..check_len];

    let pos = prefix
        .windows(8)
        .position(|w| w.eq_ignore_ascii_case(b"charset="))?;
    let mut value = &prefix[pos + 8..];

    let quote = match value.first() {
        Some(&q) if q == b'"' || q == b'\'' => {
            value = &value[1..];
            Some(q)
        }
        _ => None,
    };

    let end = value
        .iter()
        .position(|&b| match quote {
            Some(q) => b == q,
            None => b == b'"' || b == b'\'' || b == b';' || b == b'>' || b.is_ascii_whitespace(),
        })
        .unwrap_or(value.len());

    let label = std::str::from_utf8(&value[..end]).ok()?.trim();
    (!label.is_empty()).then_some(label)
}
