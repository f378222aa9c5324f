//! Arena-backed page tree.
//!
//! Every node of a parsed page lives in one `Vec` and refers to its
//! neighbours by [`NodeId`]. The parser is the only writer; locating and
//! converting conversations borrow the finished tree immutably.

use html5ever::{LocalName, Namespace, QualName};

/// Index of a node in its [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// An element attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// Tag, attributes and the `id`/`class` values selectors look at most.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub name: QualName,
    pub attrs: Vec<Attribute>,
    id: Option<String>,
    classes: Vec<String>,
}

impl ElementData {
    pub fn new(name: QualName, attrs: Vec<Attribute>) -> Self {
        let mut element = Self {
            name,
            attrs,
            id: None,
            classes: Vec::new(),
        };
        element.index_attrs();
        element
    }

    fn index_attrs(&mut self) {
        self.id = self.attr("id").map(str::to_string);
        self.classes = self
            .attr("class")
            .map(|c| c.split_ascii_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
    }

    /// Value of the first attribute with this local name.
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.local.as_ref() == local)
            .map(|a| a.value.as_str())
    }

    /// Add attributes this element does not carry yet.
    pub fn merge_attrs(&mut self, attrs: impl IntoIterator<Item = Attribute>) {
        for attr in attrs {
            if !self.attrs.iter().any(|a| a.name == attr.name) {
                self.attrs.push(attr);
            }
        }
        self.index_attrs();
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// What a node is.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
    Doctype,
}

#[derive(Debug, Clone, Copy, Default)]
struct Links {
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// A node and its position in the tree.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    links: Links,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.links.parent
    }

    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.links.prev_sibling
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.links.next_sibling
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// A parsed page.
#[derive(Debug)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Dom {
    /// An empty tree holding only the document node.
    pub fn new() -> Self {
        let mut dom = Self { nodes: Vec::new() };
        dom.push(NodeData::Document);
        dom
    }

    /// The document node; always the first node of the arena.
    pub fn document(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing but the document node exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Add a detached node.
    pub fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            data,
            links: Links::default(),
        });
        id
    }

    fn links(&mut self, id: NodeId) -> &mut Links {
        &mut self.nodes[id.index()].links
    }

    pub(super) fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(id.index())?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Make `child` the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let last = self.links(parent).last_child;

        {
            let links = self.links(child);
            links.parent = Some(parent);
            links.prev_sibling = last;
        }
        match last {
            Some(last) => self.links(last).next_sibling = Some(child),
            None => self.links(parent).first_child = Some(child),
        }
        self.links(parent).last_child = Some(child);
    }

    /// Put `child` directly before `sibling` under the same parent.
    pub fn insert_before(&mut self, sibling: NodeId, child: NodeId) {
        self.detach(child);
        let Links {
            parent,
            prev_sibling: prev,
            ..
        } = *self.links(sibling);

        {
            let links = self.links(child);
            links.parent = parent;
            links.prev_sibling = prev;
            links.next_sibling = Some(sibling);
        }
        self.links(sibling).prev_sibling = Some(child);
        match (prev, parent) {
            (Some(prev), _) => self.links(prev).next_sibling = Some(child),
            (None, Some(parent)) => self.links(parent).first_child = Some(child),
            (None, None) => {}
        }
    }

    /// Unlink a node from its parent and siblings. Its subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        let Links {
            parent,
            prev_sibling: prev,
            next_sibling: next,
            ..
        } = *self.links(id);

        match prev {
            Some(prev) => self.links(prev).next_sibling = next,
            None => {
                if let Some(parent) = parent {
                    self.links(parent).first_child = next;
                }
            }
        }
        match next {
            Some(next) => self.links(next).prev_sibling = prev,
            None => {
                if let Some(parent) = parent {
                    self.links(parent).last_child = prev;
                }
            }
        }

        let links = self.links(id);
        links.parent = None;
        links.prev_sibling = None;
        links.next_sibling = None;
    }

    /// Append text under `parent`, extending its last child when that is
    /// already a text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(last) = self.nodes[parent.index()].links.last_child
            && let NodeData::Text(existing) = &mut self.nodes[last.index()].data
        {
            existing.push_str(text);
            return;
        }
        let node = self.push(NodeData::Text(text.to_string()));
        self.append_child(parent, node);
    }

    /// Insert text before `sibling`, extending a text node already there.
    pub fn insert_text_before(&mut self, sibling: NodeId, text: &str) {
        if let Some(prev) = self.nodes[sibling.index()].links.prev_sibling
            && let NodeData::Text(existing) = &mut self.nodes[prev.index()].data
        {
            existing.push_str(text);
            return;
        }
        let node = self.push(NodeData::Text(text.to_string()));
        self.insert_before(sibling, node);
    }

    /// Children of a node, in order.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        ChildrenIter {
            dom: self,
            next: self.get(parent).and_then(|n| n.links.first_child),
        }
    }

    /// Element children only (`Element.children`).
    pub fn element_children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent).filter(|&c| self.is_element(c))
    }

    /// Every node below `root` in document order, `root` excluded.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let first = self.get(root).and_then(|n| n.links.first_child);
        Descendants {
            dom: self,
            root,
            next: first,
        }
    }

    /// First node in the document satisfying `predicate`.
    pub fn find<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.descendants(self.document())
            .find(|&id| self.get(id).is_some_and(&predicate))
    }

    /// First element with this tag name.
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.find(|node| {
            node.as_element()
                .is_some_and(|e| e.name.local.as_ref() == tag)
        })
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ChildrenIter<'a> {
    dom: &'a Dom,
    next: Option<NodeId>,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.dom.get(id).and_then(Node::next_sibling);
        Some(id)
    }
}

/// Pre-order walk that follows sibling and parent links, without a stack.
pub struct Descendants<'a> {
    dom: &'a Dom,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        let node = self.dom.get(id)?;

        self.next = node.links.first_child.or_else(|| {
            let mut current = id;
            loop {
                if current == self.root {
                    return None;
                }
                let node = self.dom.get(current)?;
                if let Some(next) = node.links.next_sibling {
                    return Some(next);
                }
                current = node.links.parent?;
            }
        });
        Some(id)
    }
}

/// Element accessors. All return a neutral value for non-element nodes.
impl Dom {
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.as_element()
    }

    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.element(id).map(|e| &e.name.local)
    }

    pub fn element_namespace(&self, id: NodeId) -> Option<&Namespace> {
        self.element(id).map(|e| &e.name.ns)
    }

    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.element_name(id).is_some_and(|n| n.as_ref() == tag)
    }

    pub fn get_attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.element(id)?.id()
    }

    pub fn element_classes(&self, id: NodeId) -> &[String] {
        self.element(id).map(ElementData::classes).unwrap_or_default()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element_classes(id).iter().any(|c| c == class)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// The string of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Concatenated text of every text node at or below `id` (`textContent`).
    pub fn text_content(&self, id: NodeId) -> String {
        match self.text(id) {
            Some(text) => text.to_string(),
            None => self
                .descendants(id)
                .filter_map(|d| self.text(d))
                .collect(),
        }
    }
}
