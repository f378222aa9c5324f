//! End-to-end exports of saved chat pages.

use std::cell::Cell;
use std::fs;

use chatdown::export::{DirEmitter, ExportDocument, FileEmitter, NOTHING_FOUND};
use chatdown::{Config, ExportOutcome, Exporter, Layout, Page};

const GROK: &str = include_str!("fixtures/grok.html");
const GEMINI: &str = include_str!("fixtures/gemini.html");
const CHATGPT: &str = include_str!("fixtures/chatgpt.html");

/// Counts emission calls without writing anything.
#[derive(Default)]
struct CountingEmitter {
    calls: Cell<usize>,
}

impl FileEmitter for CountingEmitter {
    fn emit(&self, _doc: &ExportDocument) -> chatdown::Result<()> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }
}

fn export(html: &str) -> ExportDocument {
    let page = Page::parse(html);
    let exporter = Exporter::new(&Config::default()).expect("Should build exporter");
    exporter
        .build(&page, page.layout(), None)
        .expect("Should find a conversation")
}

#[test]
fn test_grok_page() {
    let page = Page::parse(GROK);
    assert_eq!(page.layout(), Layout::BubbleList);

    let doc = export(GROK);
    assert_eq!(doc.filename(), "Grok - Borrow checker.md");
    assert_eq!(
        doc.markdown(),
        "# Exported conversation\n\n\
         ## Q:\nWhy can't I borrow `v` twice?\n\n\
         ## A:\nOnly one **mutable** borrow may exist at a time.\n\n- Use a scope\n- Or *clone*\n\n\
         ---\n\n"
    );
    // The third bubble has no answer and is dropped.
    assert!(!doc.markdown().contains("Thanks!"));
}

#[test]
fn test_gemini_page() {
    let page = Page::parse(GEMINI);
    assert_eq!(page.layout(), Layout::PairedContainers);

    let doc = export(GEMINI);
    let md = doc.markdown();
    assert_eq!(doc.filename(), "Gemini.md");
    assert_eq!(md.matches("## Q:").count(), 2);

    assert!(md.contains("## Q:\nExplain mass-energy equivalence\n\n## A:\n"));
    assert!(md.contains("Energy equals mass times $c^2$."));
    assert!(md.contains("$$\nE = mc^2\n$$"));
    assert!(!md.contains("E=mc2"));

    assert!(md.contains(
        "## Q:\nAs a table?\n\n## A:\n\
         | Symbol | Meaning |\n| --- | --- |\n| E | energy |\n| m | mass |\n\n---\n\n"
    ));
}

#[test]
fn test_chatgpt_page() {
    let doc = export(CHATGPT);
    let md = doc.markdown();

    assert_eq!(doc.filename(), "Parsing CSV files.md");
    assert!(md.starts_with(
        "# Exported conversation\n\n## Q:\nHow do I parse a CSV file with headers?\n\n## A:\n"
    ));
    assert!(md.contains("Use the `csv` crate. Add it with **cargo add**:"));
    assert!(md.contains("```\n[dependencies]\ncsv = \"1\"\n```"));
    assert!(md.contains("1. Create a *reader*\n2. Iterate over `records()`"));
    assert!(md.contains("See the [docs](https://chatgpt.com/docs/csv)."));
    assert!(md.contains(r"## Q:
Thanks, and for TSV?

## A:
Set the delimiter to `b'\t'`."));
    assert!(!md.contains("__telemetry"));
}

#[test]
fn test_single_turn_uses_sequential_form() {
    let doc = export(r#"<title>One</title><div class="message">just a question</div>"#);
    let md = doc.markdown();

    assert_eq!(md, "# Exported conversation\n\n### User:\njust a question");
    assert_eq!(md.matches("### User:").count(), 1);
    assert!(!md.contains("### Assistant:"));
    assert!(!md.contains("## Q:"));
}

#[test]
fn test_generic_page_without_markers_emits_nothing() {
    let page = Page::parse("<main><section><p>Welcome back</p></section></main>");
    let exporter = Exporter::new(&Config::default()).unwrap();
    let emitter = CountingEmitter::default();

    let outcome = exporter
        .run(&page, Layout::Generic, None, &emitter)
        .unwrap();

    assert_eq!(outcome, ExportOutcome::NothingFound);
    assert_eq!(emitter.calls.get(), 0);
    assert_eq!(NOTHING_FOUND, "No conversation elements found on this page.");
}

#[test]
fn test_export_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let page = Page::parse(GEMINI);
    let exporter = Exporter::new(&Config::default()).unwrap();

    let outcome = exporter
        .run(&page, page.layout(), None, &DirEmitter::new(dir.path()))
        .unwrap();

    let ExportOutcome::Exported(doc) = outcome else {
        panic!("expected an export");
    };
    let written = fs::read_to_string(dir.path().join("Gemini.md")).unwrap();
    assert_eq!(written, doc.markdown());
}

#[test]
fn test_nothing_found_leaves_directory_empty() {
    let dir = tempfile::tempdir().unwrap();
    let page = Page::parse("<p>nothing here</p>");
    let exporter = Exporter::new(&Config::default()).unwrap();

    exporter
        .run(&page, Layout::Generic, None, &DirEmitter::new(dir.path()))
        .unwrap();

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_explicit_url_overrides_declared_one() {
    // The fixture declares a Grok URL; forcing a generic URL finds no turns.
    let page = Page::parse(GROK).with_url("https://chatgpt.com/c/1".parse().unwrap());
    let exporter = Exporter::new(&Config::default()).unwrap();
    assert!(exporter.build(&page, page.layout(), None).is_none());
}

#[test]
fn test_custom_selectors_from_config() {
    let config = Config::from_toml_str(
        r#"
        [selectors]
        generic = ["article[data-turn]"]
        "#,
    )
    .unwrap();
    let page = Page::parse(
        r#"<article data-turn="1">ping</article><article data-turn="2">pong</article>"#,
    );

    let doc = Exporter::new(&config)
        .unwrap()
        .build(&page, Layout::Generic, None)
        .unwrap();
    assert!(doc.markdown().contains("## Q:\nping\n\n## A:\npong"));
}

#[test]
fn test_windows_1252_page() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"<meta charset=\"windows-1252\"><title>Caf\xe9 menu</title>");
    bytes.extend_from_slice(b"<div class=\"message\">cr\xe8me br\xfbl\xe9e?</div>");

    let page = Page::from_bytes(&bytes);
    let doc = Exporter::new(&Config::default())
        .unwrap()
        .build(&page, Layout::Generic, None)
        .unwrap();

    assert_eq!(doc.filename(), "Café menu.md");
    assert!(doc.markdown().ends_with("crème brûlée?"));
}

#[test]
fn test_deeply_nested_turn_exports_its_text() {
    let depth = 100_000;
    let html = format!(
        r#"<div data-message-id="1">{}<b>deep</b>{}</div>"#,
        "<span>".repeat(depth),
        "</span>".repeat(depth)
    );

    let doc = export(&html);
    assert_eq!(doc.markdown(), "# Exported conversation\n\n### User:\ndeep");
}
