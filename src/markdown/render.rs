//! Recursive-descent HTML → Markdown conversion.
//!
//! Each element kind has a rule with a fixed stage (see [`Kind::stage`]).
//! The text a rule wraps is its subtree flattened with only the rules of
//! earlier stages applied, so `<a><b>x</b></a>` keeps its bold while
//! `<b><a>x</a></b>` loses the link. The final flatten applies every rule.

use url::Url;

use super::kind::{FINAL_STAGE, Kind, classify};
use super::normalize::normalize_whitespace;
use crate::dom::{Dom, NodeData, NodeId};

/// Nesting depth past which a subtree is emitted as its visible text.
/// Rules recurse once per level.
const MAX_DEPTH: u32 = 256;

/// Options for a conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Page URL used to resolve relative link and image targets, the way a
    /// browser reports `a.href`. Targets are kept verbatim when absent.
    pub base_url: Option<Url>,
}

impl ConvertOptions {
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url: Some(base_url),
        }
    }
}

/// Convert the children of `root` (its inner HTML) to Markdown.
///
/// Never fails: markup without any recognized element comes out as its
/// visible text. The DOM is only read.
pub fn convert(dom: &Dom, root: NodeId, options: &ConvertOptions) -> String {
    let converter = Converter { dom, options };
    let mut out = String::new();
    for child in dom.children(root) {
        converter.node(child, FINAL_STAGE, Scope::default(), &mut out);
    }
    normalize_whitespace(&out)
}

/// Ancestor context within the converted fragment.
#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    display_math: bool,
    depth: u32,
}

impl Scope {
    fn enter(self, dom: &Dom, id: NodeId) -> Self {
        Self {
            display_math: self.display_math || dom.has_class(id, "katex-display"),
            depth: self.depth + 1,
        }
    }
}

struct Converter<'a> {
    dom: &'a Dom,
    options: &'a ConvertOptions,
}

impl Converter<'_> {
    /// Append the text of node `id` as seen by the rule at `stage`.
    fn node(&self, id: NodeId, stage: u8, scope: Scope, out: &mut String) {
        let Some(node) = self.dom.get(id) else {
            return;
        };

        match &node.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(_) => {
                let kind = classify(self.dom, id);
                match (kind, kind.stage()) {
                    (_, Some(own)) if own < stage => self.rule(id, kind, own, scope, out),
                    (Kind::Hidden, _) => {}
                    (Kind::Break, _) => out.push('\n'),
                    _ => self.children(id, stage, scope, out),
                }
            }
            _ => {}
        }
    }

    fn children(&self, id: NodeId, stage: u8, scope: Scope, out: &mut String) {
        let scope = scope.enter(self.dom, id);
        if scope.depth > MAX_DEPTH {
            self.visible_text(id, out);
            return;
        }
        for child in self.dom.children(id) {
            self.node(child, stage, scope, out);
        }
    }

    /// Flattened text of `id`'s subtree as seen by the rule at `stage`.
    fn text(&self, id: NodeId, stage: u8, scope: Scope) -> String {
        let mut text = String::new();
        self.children(id, stage, scope, &mut text);
        text
    }

    /// Visible text of `id`'s children without applying any rule. Iterative,
    /// used past [`MAX_DEPTH`].
    fn visible_text(&self, id: NodeId, out: &mut String) {
        let mut stack: Vec<NodeId> = self.dom.children(id).collect();
        stack.reverse();

        while let Some(next) = stack.pop() {
            let Some(node) = self.dom.get(next) else {
                continue;
            };
            match &node.data {
                NodeData::Text(text) => out.push_str(text),
                NodeData::Element(_) => match classify(self.dom, next) {
                    Kind::Hidden | Kind::MathGlyphs => {}
                    Kind::Break => out.push('\n'),
                    _ => {
                        let start = stack.len();
                        stack.extend(self.dom.children(next));
                        stack[start..].reverse();
                    }
                },
                _ => {}
            }
        }
    }

    fn rule(&self, id: NodeId, kind: Kind, stage: u8, scope: Scope, out: &mut String) {
        match kind {
            Kind::MathAnnotation => {
                let source = self.dom.text_content(id);
                let source = source.trim();
                if scope.enter(self.dom, id).display_math {
                    out.push_str(&format!("\n\n$$\n{source}\n$$\n\n"));
                } else {
                    out.push_str(&format!("${source}$"));
                }
            }
            Kind::MathGlyphs => {}
            Kind::Strong => {
                out.push_str(&format!("**{}**", self.text(id, stage, scope)));
            }
            Kind::Emphasis => {
                out.push_str(&format!("*{}*", self.text(id, stage, scope)));
            }
            Kind::Link => {
                let href = self.resolve(self.dom.get_attr(id, "href"));
                let text = self.text(id, stage, scope);
                let text = text.trim();
                let label = if text.is_empty() { href.as_str() } else { text };
                out.push_str(&format!("[{label}]({href})"));
            }
            Kind::Image => {
                let alt = self.dom.get_attr(id, "alt").unwrap_or("");
                let src = self.resolve(self.dom.get_attr(id, "src"));
                out.push_str(&format!("![{alt}]({src})"));
            }
            Kind::CodeBlock => {
                let code = self.text(id, stage, scope).replace('\u{a0}', " ");
                out.push_str(&format!("\n\n```\n{}\n```\n\n", code.trim()));
            }
            Kind::InlineCode => {
                out.push_str(&format!("`{}`", self.text(id, stage, scope)));
            }
            Kind::UnorderedList | Kind::OrderedList => {
                let inner = scope.enter(self.dom, id);
                let lines: Vec<String> = self
                    .dom
                    .element_children(id)
                    .enumerate()
                    .map(|(i, item)| {
                        let text = self.text(item, stage, inner);
                        if kind == Kind::OrderedList {
                            format!("{}. {}", i + 1, text.trim())
                        } else {
                            format!("- {}", text.trim())
                        }
                    })
                    .collect();
                out.push_str(&format!("\n{}\n", lines.join("\n")));
            }
            Kind::Heading(level) => {
                let marker = "#".repeat(level as usize);
                out.push_str(&format!(
                    "\n\n{marker} {}\n\n",
                    self.text(id, stage, scope)
                ));
            }
            Kind::Paragraph => {
                out.push_str(&format!("\n{}\n", self.text(id, stage, scope)));
            }
            Kind::Table => self.table(id, stage, scope, out),
            Kind::Break | Kind::Hidden | Kind::Container => self.children(id, stage, scope, out),
        }
    }

    /// Pipe table: `thead` header cells first, then every row of the table.
    fn table(&self, id: NodeId, stage: u8, scope: Scope, out: &mut String) {
        let mut parts = TableParts::default();
        self.collect_table(id, scope.enter(self.dom, id), stage, &mut parts);

        let has_header = !parts.header.is_empty();
        let mut lines = Vec::new();
        if has_header {
            lines.push(format!("| {} |", parts.header.join(" | ")));
            lines.push(format!("| {} |", vec!["---"; parts.header.len()].join(" | ")));
        }

        for (row, in_head, row_scope) in parts.rows {
            // The header line already carries the thead row.
            if in_head && has_header {
                continue;
            }
            let inner = row_scope.enter(self.dom, row);
            let cells: Vec<String> = self
                .dom
                .element_children(row)
                .map(|cell| self.text(cell, stage, inner).trim().to_string())
                .collect();
            if !cells.is_empty() {
                lines.push(format!("| {} |", cells.join(" | ")));
            }
        }

        out.push_str(&format!("\n{}\n", lines.join("\n")));
    }

    fn collect_table(&self, id: NodeId, scope: Scope, stage: u8, parts: &mut TableParts) {
        let mut stack: Vec<(NodeId, bool, Scope)> = self
            .dom
            .element_children(id)
            .map(|child| (child, false, scope))
            .collect();
        stack.reverse();

        while let Some((child, in_head, scope)) = stack.pop() {
            if self.dom.is_tag(child, "tr") {
                parts.rows.push((child, in_head, scope));
            } else if in_head && self.dom.is_tag(child, "th") {
                parts
                    .header
                    .push(self.text(child, stage, scope).trim().to_string());
            }

            let child_in_head = in_head || self.dom.is_tag(child, "thead");
            let child_scope = scope.enter(self.dom, child);
            let start = stack.len();
            stack.extend(
                self.dom
                    .element_children(child)
                    .map(|grandchild| (grandchild, child_in_head, child_scope)),
            );
            stack[start..].reverse();
        }
    }

    fn resolve(&self, target: Option<&str>) -> String {
        let Some(target) = target else {
            return String::new();
        };
        match &self.options.base_url {
            Some(base) => base
                .join(target)
                .map(String::from)
                .unwrap_or_else(|_| target.to_string()),
            None => target.to_string(),
        }
    }
}

#[derive(Default)]
struct TableParts {
    header: Vec<String>,
    rows: Vec<(NodeId, bool, Scope)>,
}
