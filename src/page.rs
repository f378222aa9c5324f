//! A parsed chat page and what it says about itself.

use url::Url;

use crate::dom::{Dom, parse_html, parse_html_bytes};
use crate::locate::Layout;

/// A saved conversation page.
///
/// The page URL decides the layout and resolves relative links. It comes
/// from [`Page::with_url`] or, failing that, from the page's own
/// `<link rel="canonical">` or `<meta property="og:url">`.
pub struct Page {
    dom: Dom,
    url: Option<Url>,
}

impl Page {
    /// Parse page HTML.
    pub fn parse(html: &str) -> Self {
        Self::from_dom(parse_html(html))
    }

    /// Parse raw page bytes, detecting their encoding.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_dom(parse_html_bytes(bytes))
    }

    fn from_dom(dom: Dom) -> Self {
        let url = declared_url(&dom);
        Self { dom, url }
    }

    /// Override the page URL.
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// The layout implied by the page URL; generic when the URL is unknown.
    pub fn layout(&self) -> Layout {
        self.url.as_ref().map_or(Layout::Generic, Layout::detect)
    }

    /// The document title, whitespace-collapsed like `document.title`.
    pub fn title(&self) -> String {
        self.dom
            .find_by_tag("title")
            .map(|id| {
                self.dom
                    .text_content(id)
                    .split_ascii_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }
}

fn declared_url(dom: &Dom) -> Option<Url> {
    dom.descendants(dom.document())
        .filter_map(|id| {
            let element = dom.element(id)?;
            match element.name.local.as_ref() {
                "link"
                    if element.attr("rel").is_some_and(|rel| {
                        rel.split_ascii_whitespace()
                            .any(|r| r.eq_ignore_ascii_case("canonical"))
                    }) =>
                {
                    element.attr("href")
                }
                "meta" if element.attr("property") == Some("og:url") => element.attr("content"),
                _ => None,
            }
        })
        .find_map(|href| Url::parse(href).ok())
}
