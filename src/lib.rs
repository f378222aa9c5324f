//! # chatdown
//!
//! Export AI chat conversations (ChatGPT, Gemini, Grok) from saved pages to
//! Markdown.
//!
//! ## Features
//!
//! - Locate conversation turns on each site's page layout
//! - Convert rich message markup (code, math, lists, tables, links) to Markdown
//! - Assemble question/answer documents with filesystem-safe filenames
//! - Run from the command line or in the browser via WASM
//!
//! ## Quick Start
//!
//! ```
//! use chatdown::{Config, Exporter, Page};
//!
//! let page = Page::parse(
//!     r#"<title>Borrowing</title>
//!     <div data-message-id="1">Why does this not compile?</div>
//!     <div data-message-id="2">You hold a <em>mutable</em> borrow.</div>"#,
//! );
//!
//! let exporter = Exporter::new(&Config::default())?;
//! let doc = exporter.build(&page, page.layout(), None).unwrap();
//! assert_eq!(doc.filename(), "Borrowing.md");
//! assert!(doc.markdown().contains("## A:\nYou hold a *mutable* borrow."));
//! # Ok::<(), chatdown::Error>(())
//! ```
//!
//! Converting a single snippet:
//!
//! ```
//! assert_eq!(chatdown::html_to_markdown("<h2>Setup</h2><p>Run it</p>"), "## Setup\n\nRun it");
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod export;
pub mod filename;
pub mod locate;
pub mod markdown;
pub mod page;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::Config;
pub use error::{Error, Result};
pub use export::{ExportDocument, ExportOutcome, Exporter};
pub use locate::Layout;
pub use markdown::html_to_markdown;
pub use page::Page;
