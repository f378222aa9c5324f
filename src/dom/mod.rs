//! HTML parsing into an arena DOM, plus selector matching.
//!
//! ```
//! use chatdown::dom::{SelectorSet, parse_html};
//!
//! let dom = parse_html(r#"<div class="message-bubble">Hi</div>"#);
//! let bubbles = SelectorSet::parse("div.message-bubble")?
//!     .select_all(&dom, dom.document());
//! assert_eq!(bubbles.len(), 1);
//! assert_eq!(dom.text_content(bubbles[0]), "Hi");
//! # Ok::<(), chatdown::Error>(())
//! ```

mod arena;
mod select;
mod tree_sink;

pub use arena::{Attribute, ChildrenIter, Descendants, Dom, ElementData, Node, NodeData, NodeId};
pub use select::{DomSelectors, ElementRef, SelectorSet};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::DomSink;

/// Parse an HTML document (or a fragment, which html5ever wraps in
/// `html`/`body`) into a [`Dom`].
pub fn parse_html(html: &str) -> Dom {
    let sink = DomSink::default();
    parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// Parse raw page bytes, detecting their encoding first.
///
/// Supports UTF-8, a `<meta charset>` hint, and Windows-1252 fallback.
pub fn parse_html_bytes(html: &[u8]) -> Dom {
    let hint = crate::util::extract_meta_charset(html);
    let text = crate::util::decode_text(html, hint);
    parse_html(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_html_bytes_windows_1252() {
        // 0xE9 is "é" in Windows-1252 and invalid as UTF-8.
        let bytes = b"<html><head><meta charset=\"windows-1252\"></head><body><p>caf\xE9</p></body></html>";
        let dom = parse_html_bytes(bytes);
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(dom.text_content(p), "café");
    }

    #[test]
    fn test_fragment_is_wrapped_in_body() {
        let dom = parse_html("<p>loose</p>");
        let body = dom.find_by_tag("body").unwrap();
        let p = dom.element_children(body).next().unwrap();
        assert!(dom.is_tag(p, "p"));
    }
}
