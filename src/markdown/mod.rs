//! HTML → Markdown conversion of conversation turns.
//!
//! - [`kind`]: classification of elements into conversion kinds
//! - [`render`]: the staged recursive-descent converter
//! - [`normalize`]: final whitespace normalization
//!
//! ## Design Notes
//!
//! Conversion is best effort and never fails. Rules run in a fixed order
//! (see [`Kind::stage`]) and a rule only sees the output of rules that ran
//! before it. Anything nested inside an element whose rule runs earlier
//! contributes plain text: a link inside `**bold**` loses its target, while
//! bold text inside a list item keeps its markers.

mod kind;
mod normalize;
mod render;

pub use kind::{FINAL_STAGE, Kind, classify};
pub use normalize::normalize_whitespace;
pub use render::{ConvertOptions, convert};

use crate::dom::parse_html;

/// Convert an HTML snippet to Markdown.
///
/// ```
/// use chatdown::markdown::html_to_markdown;
///
/// assert_eq!(
///     html_to_markdown("<p>Use <code>cargo</code> and <b>read</b> the docs.</p>"),
///     "Use `cargo` and **read** the docs."
/// );
/// ```
pub fn html_to_markdown(html: &str) -> String {
    let dom = parse_html(html);
    let root = dom.find_by_tag("body").unwrap_or(dom.document());
    convert(&dom, root, &ConvertOptions::default())
}
