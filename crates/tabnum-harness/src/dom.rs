//! Arena-backed element tree implementing [`Document`].
//!
//! Elements are never freed; detached and removed elements keep their
//! slot, so stale handles stay safe to query (they report no parent and
//! are skipped by document-wide lookups).

use std::collections::BTreeMap;

use tabnum_core::host::Document;

/// Handle to one element of an [`ElementTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u32);

impl ElementId {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    removed: bool,
}

/// In-memory document rooted at a `body` element.
#[derive(Debug, Clone)]
pub struct ElementTree {
    nodes: Vec<Node>,
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTree {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                tag: "body".to_owned(),
                ..Node::default()
            }],
        }
    }

    /// The `body` element.
    #[must_use]
    pub const fn root(&self) -> ElementId {
        ElementId(0)
    }

    /// Create a detached element carrying `classes`.
    pub fn create(&mut self, tag: &str, classes: &[&str]) -> ElementId {
        let id = ElementId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node {
            tag: tag.to_owned(),
            classes: classes.iter().map(|&class| class.to_owned()).collect(),
            ..Node::default()
        });
        id
    }

    /// Create an element and append it to `parent`.
    pub fn append(&mut self, parent: ElementId, tag: &str, classes: &[&str]) -> ElementId {
        let id = self.create(tag, classes);
        self.append_child(parent, id);
        id
    }

    #[must_use]
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.node(id).map(|node| node.tag.as_str())
    }

    #[must_use]
    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.node(id).map(|node| node.text.as_str())
    }

    #[must_use]
    pub fn style(&self, id: ElementId, name: &str) -> Option<&str> {
        self.node(id)?.style.get(name).map(String::as_str)
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(node) = self.node_mut(id) {
            node.attributes.remove(name);
        }
    }

    /// Whether the element is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.node(id).is_some() && self.contains(self.root(), id)
    }

    /// Whether the element was discarded through [`Document::remove`].
    #[must_use]
    pub fn is_removed(&self, id: ElementId) -> bool {
        self.node(id).is_none_or(|node| node.removed)
    }

    /// Detach the element (and its subtree) from its parent.
    pub fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.node(id).and_then(|node| node.parent) else {
            return;
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|&child| child != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Move `child` to position `index` among `parent`'s children.
    pub fn insert_at(&mut self, parent: ElementId, child: ElementId, index: usize) {
        if self.node(parent).is_none() || self.node(child).is_none() || parent == child {
            return;
        }
        self.detach(child);
        if let Some(parent_node) = self.node_mut(parent) {
            let index = index.min(parent_node.children.len());
            parent_node.children.insert(index, child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Attached descendants of `root` in pre-order, `root` excluded.
    #[must_use]
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self
            .node(root)
            .map(|node| node.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }
}

impl Document for ElementTree {
    type Element = ElementId;

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element)?.parent
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.node(element)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element)
            .is_some_and(|node| node.classes.iter().any(|c| c == class))
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.node(element)?.attributes.get(name).cloned()
    }

    fn find_all_by_class(&self, class: &str) -> Vec<ElementId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    fn find_descendant_by_class(&self, root: ElementId, class: &str) -> Option<ElementId> {
        self.descendants(root)
            .into_iter()
            .find(|&id| self.has_class(id, class))
    }

    fn create_element(&mut self, tag: &str) -> ElementId {
        self.create(tag, &[])
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element)
            && !node.classes.iter().any(|c| c == class)
        {
            node.classes.push(class.to_owned());
        }
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(element) {
            node.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(node) = self.node_mut(element) {
            node.text = text.to_owned();
        }
    }

    fn set_style_property(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(element) {
            node.style.insert(name.to_owned(), value.to_owned());
        }
    }

    fn insert_before(&mut self, parent: ElementId, child: ElementId, reference: ElementId) {
        self.detach(child);
        let index = self
            .node(parent)
            .and_then(|node| node.children.iter().position(|&c| c == reference));
        match index {
            Some(index) => self.insert_at(parent, child, index),
            None => self.append_child(parent, child),
        }
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.insert_at(parent, child, usize::MAX);
    }

    fn remove(&mut self, element: ElementId) {
        self.detach(element);
        if let Some(node) = self.node_mut(element) {
            node.removed = true;
        }
    }
}
