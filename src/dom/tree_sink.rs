//! Feeds html5ever's tree builder into a [`Dom`].

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as ParsedAttribute, QualName};

use super::arena::{Attribute, Dom, ElementData, NodeData, NodeId};

fn convert_attrs(attrs: Vec<ParsedAttribute>) -> Vec<Attribute> {
    attrs
        .into_iter()
        .map(|a| Attribute {
            name: a.name,
            value: a.value.to_string(),
        })
        .collect()
}

/// Tree builder target.
///
/// `TreeSink` methods take `&self`, so the tree sits in a `RefCell`.
#[derive(Default)]
pub struct DomSink {
    dom: RefCell<Dom>,
}

impl DomSink {
    pub fn into_dom(self) -> Dom {
        self.dom.into_inner()
    }
}

impl TreeSink for DomSink {
    type Handle = NodeId;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self {
        self
    }

    // Saved pages are routinely malformed; recover silently like a browser.
    fn parse_error(&self, _msg: Cow<'static, str>) {}

    fn get_document(&self) -> NodeId {
        self.dom.borrow().document()
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> &'a QualName {
        static NO_NAME: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        let dom = self.dom.borrow();
        match dom.element(*target) {
            // SAFETY: element names are never mutated or dropped while the
            // sink is alive, and the tree builder drops the returned name
            // before it next mutates the tree.
            Some(element) => unsafe { std::mem::transmute::<&QualName, &'a QualName>(&element.name) },
            None => &NO_NAME,
        }
    }

    fn create_element(&self, name: QualName, attrs: Vec<ParsedAttribute>, _: ElementFlags) -> NodeId {
        let element = ElementData::new(name, convert_attrs(attrs));
        self.dom.borrow_mut().push(NodeData::Element(element))
    }

    fn create_comment(&self, text: StrTendril) -> NodeId {
        self.dom.borrow_mut().push(NodeData::Comment(text.to_string()))
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> NodeId {
        self.dom.borrow_mut().push(NodeData::Comment(data.to_string()))
    }

    fn append(&self, parent: &NodeId, child: NodeOrText<NodeId>) {
        let mut dom = self.dom.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => dom.append_child(*parent, node),
            NodeOrText::AppendText(text) => dom.append_text(*parent, &text),
        }
    }

    fn append_before_sibling(&self, sibling: &NodeId, child: NodeOrText<NodeId>) {
        let mut dom = self.dom.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => dom.insert_before(*sibling, node),
            NodeOrText::AppendText(text) => dom.insert_text_before(*sibling, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        let has_parent = self
            .dom
            .borrow()
            .get(*element)
            .and_then(|n| n.parent())
            .is_some();

        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(&self, _: StrTendril, _: StrTendril, _: StrTendril) {
        let mut dom = self.dom.borrow_mut();
        let doctype = dom.push(NodeData::Doctype);
        let document = dom.document();
        dom.append_child(document, doctype);
    }

    // Template contents stay in the tree; the converter treats `template`
    // as hidden.
    fn get_template_contents(&self, target: &NodeId) -> NodeId {
        *target
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    // Quirks mode only affects layout, which is never computed here.
    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn add_attrs_if_missing(&self, target: &NodeId, attrs: Vec<ParsedAttribute>) {
        if let Some(element) = self.dom.borrow_mut().element_mut(*target) {
            element.merge_attrs(convert_attrs(attrs));
        }
    }

    fn remove_from_parent(&self, target: &NodeId) {
        self.dom.borrow_mut().detach(*target);
    }

    fn reparent_children(&self, node: &NodeId, new_parent: &NodeId) {
        let mut dom = self.dom.borrow_mut();
        let children: Vec<_> = dom.children(*node).collect();
        for child in children {
            dom.append_child(*new_parent, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::parse_html;

    #[test]
    fn test_page_skeleton_is_synthesized() {
        let dom = parse_html("<p>Hello</p>");

        for tag in ["html", "head", "body", "p"] {
            assert!(dom.find_by_tag(tag).is_some(), "missing <{tag}>");
        }
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(dom.text_content(p), "Hello");
    }

    #[test]
    fn test_message_attributes() {
        let dom = parse_html(r#"<div data-message-id="abc" class="message group">Content</div>"#);

        let div = dom.find_by_tag("div").expect("should find div");
        assert_eq!(dom.get_attr(div, "data-message-id"), Some("abc"));
        assert!(dom.has_class(div, "message"));
        assert!(dom.has_class(div, "group"));
    }

    #[test]
    fn test_custom_elements_survive() {
        let dom = parse_html(
            "<user-query-content>hi</user-query-content><model-response>hello</model-response>",
        );

        let query = dom.find_by_tag("user-query-content").expect("query element");
        let response = dom.find_by_tag("model-response").expect("response element");
        assert_eq!(dom.text_content(query), "hi");
        assert_eq!(dom.text_content(response), "hello");
    }

    #[test]
    fn test_misnested_markup_is_repaired() {
        // Adoption agency reparents children; no text may be lost.
        let dom = parse_html("<p><b>bold <i>both</b> italic</i></p>");

        let p = dom.find_by_tag("p").expect("should find p");
        assert_eq!(dom.text_content(p), "bold both italic");
    }

    #[test]
    fn test_foster_parented_text_keeps_order() {
        let dom = parse_html("<table>stray<tr><td>cell</td></tr></table>");

        let body = dom.find_by_tag("body").unwrap();
        assert_eq!(dom.text_content(body), "straycell");
    }

    #[test]
    fn test_duplicate_body_attrs_merge() {
        let dom = parse_html(r#"<body class="a"><p>x</p><body id="late" class="b">"#);

        let body = dom.find_by_tag("body").unwrap();
        assert!(dom.has_class(body, "a"));
        assert!(!dom.has_class(body, "b"));
        assert_eq!(dom.element_id(body), Some("late"));
    }
}
