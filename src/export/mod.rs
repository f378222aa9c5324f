//! Assembling located turns into a Markdown document and emitting it.
//!
//! # Example
//!
//! ```
//! use chatdown::{Config, Page};
//! use chatdown::export::Exporter;
//! use chatdown::locate::Layout;
//!
//! let page = Page::parse(
//!     r#"<title>Lifetimes</title>
//!     <div class="message-bubble">What is <code>'static</code>?</div>
//!     <div class="message-bubble">A lifetime that lasts <b>forever</b>.</div>"#,
//! );
//! let exporter = Exporter::new(&Config::default())?;
//! let doc = exporter.build(&page, Layout::BubbleList, None).unwrap();
//!
//! assert_eq!(doc.filename(), "Lifetimes.md");
//! assert!(doc.markdown().starts_with("# Exported conversation\n\n## Q:\nWhat is `'static`?"));
//! # Ok::<(), chatdown::Error>(())
//! ```

use std::fmt::Write as _;

use crate::config::Config;
use crate::error::Result;
use crate::filename;
use crate::locate::{Layout, Locator, Role};
use crate::markdown::{ConvertOptions, convert};
use crate::page::Page;

mod emit;

pub use emit::{DirEmitter, FileEmitter, StdoutEmitter};

/// Notice reported when a page holds no conversation.
pub const NOTHING_FOUND: &str = "No conversation elements found on this page.";

/// An assembled export: Markdown text and the name to save it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    markdown: String,
    filename: String,
}

impl ExportDocument {
    pub fn new(markdown: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            filename: filename.into(),
        }
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// What an export run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The page had no conversation; nothing was emitted.
    NothingFound,
    /// The document that was emitted.
    Exported(ExportDocument),
}

/// Runs the locate, convert, assemble and emit pipeline for a page.
#[derive(Debug, Clone)]
pub struct Exporter {
    locator: Locator,
    title_line: String,
    default_filename: String,
}

impl Exporter {
    /// Build an exporter, compiling the configured selectors.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            locator: Locator::new(&config.selectors)?,
            title_line: config.title_line.clone(),
            default_filename: config.default_filename.clone(),
        })
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Assemble the export document for `page`, or `None` when the page has
    /// no conversation turns.
    ///
    /// `title` overrides the title found on the page when naming the file.
    pub fn build(&self, page: &Page, layout: Layout, title: Option<&str>) -> Option<ExportDocument> {
        let located = self.locator.locate(page, layout);
        if located.is_empty() {
            return None;
        }

        let options = ConvertOptions {
            base_url: page.url().cloned(),
        };
        let texts: Vec<String> = located
            .turns
            .iter()
            .map(|turn| convert(page.dom(), turn.node, &options))
            .collect();

        let markdown = assemble(&texts, &self.title_line);
        let title = title.unwrap_or(&located.title);
        let filename = filename::for_title(Some(title), &self.default_filename);

        Some(ExportDocument { markdown, filename })
    }

    /// Export `page` through `emitter`.
    ///
    /// A page without a conversation is reported as
    /// [`ExportOutcome::NothingFound`] and nothing is emitted.
    pub fn run(
        &self,
        page: &Page,
        layout: Layout,
        title: Option<&str>,
        emitter: &dyn FileEmitter,
    ) -> Result<ExportOutcome> {
        let Some(doc) = self.build(page, layout, title) else {
            tracing::info!(platform = layout.platform(), "{NOTHING_FOUND}");
            return Ok(ExportOutcome::NothingFound);
        };

        emitter.emit(&doc)?;
        Ok(ExportOutcome::Exported(doc))
    }
}

/// Join converted turn texts into the final document.
///
/// Turns are paired as `## Q:` / `## A:` blocks; a trailing unpaired turn
/// is dropped. With fewer than two turns there is no pair, and the turns
/// are written one by one under `### User:` / `### Assistant:` headings.
/// Both forms start with `title_line` and a blank line.
///
/// ```
/// use chatdown::export::assemble;
///
/// let texts = vec!["hi".to_string(), "hello".to_string()];
/// assert_eq!(
///     assemble(&texts, "# Chat"),
///     "# Chat\n\n## Q:\nhi\n\n## A:\nhello\n\n---\n\n"
/// );
/// assert_eq!(assemble(&texts[..1], "# Chat"), "# Chat\n\n### User:\nhi");
/// ```
pub fn assemble(texts: &[String], title_line: &str) -> String {
    let mut out = format!("{title_line}\n\n");

    if texts.len() >= 2 {
        tracing::debug!(pairs = texts.len() / 2, "assembling question/answer pairs");
        for pair in texts.chunks_exact(2) {
            let _ = write!(out, "## Q:\n{}\n\n## A:\n{}\n\n---\n\n", pair[0], pair[1]);
        }
    } else {
        tracing::debug!(turns = texts.len(), "assembling sequential turns");
        let blocks: Vec<String> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| format!("### {}:\n{text}", Role::at(i).label()))
            .collect();
        out.push_str(&blocks.join("\n\n---\n\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<ExportDocument>>);

    impl FileEmitter for Recorder {
        fn emit(&self, doc: &ExportDocument) -> Result<()> {
            self.0.borrow_mut().push(doc.clone());
            Ok(())
        }
    }

    fn exporter() -> Exporter {
        Exporter::new(&Config::default()).unwrap()
    }

    fn strings(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_assemble_drops_trailing_unpaired_turn() {
        let out = assemble(&strings(&["q1", "a1", "q2", "a2", "q3"]), "# T");
        assert_eq!(
            out,
            "# T\n\n## Q:\nq1\n\n## A:\na1\n\n---\n\n## Q:\nq2\n\n## A:\na2\n\n---\n\n"
        );
        assert!(!out.contains("q3"));
    }

    #[test]
    fn test_assemble_single_turn() {
        let out = assemble(&strings(&["only"]), "# T");
        assert_eq!(out.matches("### User:").count(), 1);
        assert!(!out.contains("### Assistant:"));
        assert!(!out.contains("## Q:"));
    }

    #[test]
    fn test_assemble_no_turns_is_title_only() {
        assert_eq!(assemble(&[], "# T"), "# T\n\n");
    }

    #[test]
    fn test_build_names_file_from_title() {
        let page = Page::parse(
            r#"<title>Q&amp;A: plan?</title>
            <div class="message-bubble">a</div><div class="message-bubble">b</div>"#,
        );
        let doc = exporter().build(&page, Layout::BubbleList, None).unwrap();
        assert_eq!(doc.filename(), "Q&A_ plan_.md");
    }

    #[test]
    fn test_build_title_override() {
        let page = Page::parse(r#"<title>Page</title><div class="message-bubble">a</div>"#);
        let doc = exporter()
            .build(&page, Layout::BubbleList, Some("Custom name"))
            .unwrap();
        assert_eq!(doc.filename(), "Custom name.md");
    }

    #[test]
    fn test_untitled_page_uses_default_filename() {
        let page = Page::parse(r#"<div class="message-bubble">a</div>"#);
        let doc = exporter().build(&page, Layout::BubbleList, None).unwrap();
        assert_eq!(doc.filename(), "chat_export.md");
    }

    #[test]
    fn test_run_emits_document() {
        let page = Page::parse(
            r#"<div data-message-id="1"><p>Hi</p></div><div data-message-id="2"><p>Hello</p></div>"#,
        );
        let recorder = Recorder::default();
        let outcome = exporter()
            .run(&page, Layout::Generic, None, &recorder)
            .unwrap();

        let emitted = recorder.0.borrow();
        assert_eq!(emitted.len(), 1);
        assert_eq!(outcome, ExportOutcome::Exported(emitted[0].clone()));
        assert_eq!(
            emitted[0].markdown(),
            "# Exported conversation\n\n## Q:\nHi\n\n## A:\nHello\n\n---\n\n"
        );
    }

    #[test]
    fn test_nothing_found_emits_nothing() {
        let page = Page::parse("<main><div>plain</div></main>");
        let recorder = Recorder::default();
        let outcome = exporter()
            .run(&page, Layout::Generic, None, &recorder)
            .unwrap();

        assert_eq!(outcome, ExportOutcome::NothingFound);
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_configured_title_line() {
        let config = Config {
            title_line: "# Chat log".into(),
            ..Config::default()
        };
        let page = Page::parse(r#"<div class="message-bubble">a</div>"#);
        let doc = Exporter::new(&config)
            .unwrap()
            .build(&page, Layout::BubbleList, None)
            .unwrap();
        assert_eq!(doc.markdown(), "# Chat log\n\n### User:\na");
    }

    #[test]
    fn test_links_resolve_against_page_url() {
        let page = Page::parse(
            r#"<link rel="canonical" href="https://grok.com/chat/1">
            <div class="message-bubble">see <a href="/docs">docs</a></div>
            <div class="message-bubble">ok</div>"#,
        );
        let doc = exporter().build(&page, page.layout(), None).unwrap();
        assert!(doc.markdown().contains("see [docs](https://grok.com/docs)"));
    }
}
