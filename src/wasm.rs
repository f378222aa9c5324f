//! WASM bindings for exporting from inside the browser.
//!
//! The host page passes its own HTML and URL; finished documents are handed
//! back through a JavaScript callback, which decides how to save them.

use wasm_bindgen::prelude::*;

use crate::config::Config;
use crate::export::{ExportDocument, ExportOutcome, Exporter, FileEmitter};
use crate::page::Page;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert an HTML snippet to Markdown.
#[wasm_bindgen]
pub fn html_to_markdown(html: &str) -> String {
    crate::markdown::html_to_markdown(html)
}

/// Make a title safe to use as a file stem.
#[wasm_bindgen]
pub fn sanitize_filename(name: &str) -> String {
    crate::filename::sanitize(name)
}

/// Export the conversation on a page.
///
/// Calls `emit(markdown, filename)` once with the finished document and
/// returns `true`, or returns `false` without calling it when the page has
/// no conversation.
#[wasm_bindgen]
pub fn export_page(html: &str, url: &str, emit: &js_sys::Function) -> Result<bool, JsValue> {
    let url = url::Url::parse(url).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let page = Page::parse(html).with_url(url);

    let exporter =
        Exporter::new(&Config::default()).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let outcome = exporter
        .run(&page, page.layout(), None, &JsEmitter(emit))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(matches!(outcome, ExportOutcome::Exported(_)))
}

struct JsEmitter<'a>(&'a js_sys::Function);

impl FileEmitter for JsEmitter<'_> {
    fn emit(&self, doc: &ExportDocument) -> crate::Result<()> {
        self.0
            .call2(
                &JsValue::NULL,
                &JsValue::from_str(doc.markdown()),
                &JsValue::from_str(doc.filename()),
            )
            .map_err(|e| {
                let message = e.as_string().unwrap_or_else(|| format!("{e:?}"));
                std::io::Error::other(message)
            })?;
        Ok(())
    }
}
