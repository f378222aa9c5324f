//! Maps HTML elements to conversion kinds.

use crate::dom::{Dom, NodeId};

/// What a node converts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// TeX source annotation inside KaTeX/MathML output.
    MathAnnotation,
    /// Glyph-only math rendering, dropped in favor of the annotation.
    MathGlyphs,
    Strong,
    Emphasis,
    Link,
    Image,
    CodeBlock,
    InlineCode,
    UnorderedList,
    OrderedList,
    Heading(u8),
    Paragraph,
    Table,
    /// Line break; contributes a newline.
    Break,
    /// Not visible text: scripts, styles, templates.
    Hidden,
    /// Anything else; only its text passes through.
    Container,
}

/// Stage after every rule, where the remaining visible text is flattened.
pub const FINAL_STAGE: u8 = 18;

impl Kind {
    /// Position of this kind's rule in the conversion pipeline.
    ///
    /// A rule sees descendants of earlier stages already converted and
    /// descendants of its own or later stages as plain text. Containers,
    /// breaks and hidden nodes have no rule of their own.
    pub fn stage(self) -> Option<u8> {
        match self {
            Kind::MathAnnotation | Kind::MathGlyphs => Some(1),
            Kind::Strong => Some(2),
            Kind::Emphasis => Some(3),
            Kind::Link => Some(4),
            Kind::Image => Some(5),
            Kind::CodeBlock => Some(6),
            Kind::InlineCode => Some(7),
            Kind::UnorderedList => Some(8),
            Kind::OrderedList => Some(9),
            Kind::Heading(level) => Some(9 + level),
            Kind::Paragraph => Some(16),
            Kind::Table => Some(17),
            Kind::Break | Kind::Hidden | Kind::Container => None,
        }
    }
}

/// Classify an element node.
///
/// `code` is always [`Kind::InlineCode`] here: a `code` inside `pre` is
/// consumed by the earlier code-block stage and never reaches its own rule.
pub fn classify(dom: &Dom, id: NodeId) -> Kind {
    let Some(name) = dom.element_name(id) else {
        return Kind::Container;
    };

    match name.as_ref() {
        "annotation" if dom.get_attr(id, "encoding") == Some("application/x-tex") => {
            Kind::MathAnnotation
        }
        "mrow" => Kind::MathGlyphs,
        "span" if dom.has_class(id, "katex-html") => Kind::MathGlyphs,

        "strong" | "b" => Kind::Strong,
        "em" | "i" => Kind::Emphasis,
        "a" => Kind::Link,
        "img" => Kind::Image,
        "pre" => Kind::CodeBlock,
        "code" => Kind::InlineCode,
        "ul" => Kind::UnorderedList,
        "ol" => Kind::OrderedList,

        "h1" => Kind::Heading(1),
        "h2" => Kind::Heading(2),
        "h3" => Kind::Heading(3),
        "h4" => Kind::Heading(4),
        "h5" => Kind::Heading(5),
        "h6" => Kind::Heading(6),

        "p" => Kind::Paragraph,
        "table" => Kind::Table,
        "br" => Kind::Break,

        "script" | "style" | "template" | "noscript" => Kind::Hidden,

        _ => Kind::Container,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn kind_of(html: &str, tag: &str) -> Kind {
        let dom = parse_html(html);
        classify(&dom, dom.find_by_tag(tag).unwrap())
    }

    #[test]
    fn test_classify_inline_kinds() {
        assert_eq!(kind_of("<b>x</b>", "b"), Kind::Strong);
        assert_eq!(kind_of("<i>x</i>", "i"), Kind::Emphasis);
        assert_eq!(kind_of("<a href='#'>x</a>", "a"), Kind::Link);
        assert_eq!(kind_of("<h4>x</h4>", "h4"), Kind::Heading(4));
        assert_eq!(kind_of("<section>x</section>", "section"), Kind::Container);
    }

    #[test]
    fn test_classify_math() {
        let html = r#"<span class="katex"><math><semantics><mrow><mi>x</mi></mrow>
            <annotation encoding="application/x-tex">x</annotation></semantics></math>
            <span class="katex-html">x</span></span>"#;
        assert_eq!(kind_of(html, "annotation"), Kind::MathAnnotation);
        assert_eq!(kind_of(html, "mrow"), Kind::MathGlyphs);

        let dom = parse_html(html);
        let glyphs = dom
            .descendants(dom.document())
            .find(|&id| dom.has_class(id, "katex-html"))
            .unwrap();
        assert_eq!(classify(&dom, glyphs), Kind::MathGlyphs);
    }

    #[test]
    fn test_annotation_without_tex_encoding_is_plain() {
        let html = r#"<math><semantics><annotation encoding="text/plain">x</annotation></semantics></math>"#;
        assert_eq!(kind_of(html, "annotation"), Kind::Container);
    }

    #[test]
    fn test_heading_stages_ascend_by_level() {
        let stages: Vec<_> = (1..=6).map(|l| Kind::Heading(l).stage().unwrap()).collect();
        assert!(stages.windows(2).all(|w| w[0] < w[1]));
        assert!(Kind::OrderedList.stage() < Kind::Heading(1).stage());
        assert!(Kind::Heading(6).stage() < Kind::Paragraph.stage());
        assert!(Kind::Table.stage().unwrap() < FINAL_STAGE);
    }
}
