//! Arena-backed element tree that behaviours attach to.
//!
//! [`Document`] is a cheap, cloneable handle over a single-threaded tree of
//! elements. Every element is addressed by a copyable [`NodeId`]; ids are
//! never reused, so a detached element keeps its id and can be re-inserted.
//! Traversal helpers walk the *live* tree, which means callers always observe
//! the current structure rather than a snapshot.
//!
//! ```rust,ignore
//! use shui_core::dom::Document;
//!
//! let doc = Document::new();
//! let list = doc.create_element("menu");
//! let item = doc.create_element_with_text("li", "Apple");
//! doc.append_child(doc.body(), list)?;
//! doc.append_child(list, item)?;
//! doc.set_attribute(item, "role", "menuitem");
//! assert_eq!(doc.text_content(list), "Apple");
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Handle to an element inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Errors produced by structural mutations of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The handle was not created by this document.
    #[error("node {0:?} does not belong to this document")]
    UnknownNode(NodeId),
    /// The insertion would make a node its own ancestor.
    #[error("cannot insert {child:?} into {parent:?}: the child is an ancestor of the parent")]
    HierarchyRequest {
        /// The requested parent.
        parent: NodeId,
        /// The node that was being inserted.
        child: NodeId,
    },
}

struct Node {
    tag: String,
    text: String,
    attributes: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            text: String::new(),
            attributes: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

struct Tree {
    nodes: Vec<Node>,
    focused: Option<NodeId>,
}

impl Tree {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    fn sibling(&self, id: NodeId, offset: isize) -> Option<NodeId> {
        let parent = self.node(id)?.parent?;
        let siblings = &self.node(parent)?.children;
        let index = siblings.iter().position(|&c| c == id)?;
        let target = index.checked_add_signed(offset)?;
        siblings.get(target).copied()
    }

    fn deepest_last(&self, mut id: NodeId) -> NodeId {
        while let Some(&last) = self.node(id).and_then(|n| n.children.last()) {
            id = last;
        }
        id
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(node) = self.node(id) {
            out.push_str(&node.text);
            for &child in &node.children {
                self.collect_text(child, out);
            }
        }
    }
}

/// Shared handle to an element tree rooted at a `body` element.
///
/// Cloning a `Document` clones the handle, not the tree.
#[derive(Clone)]
pub struct Document {
    tree: Rc<RefCell<Tree>>,
}

const BODY: NodeId = NodeId(0);

impl Document {
    /// Create an empty document containing only its `body`.
    pub fn new() -> Self {
        Self {
            tree: Rc::new(RefCell::new(Tree {
                nodes: vec![Node::new("body")],
                focused: None,
            })),
        }
    }

    /// The root element every connected node descends from.
    pub fn body(&self) -> NodeId {
        BODY
    }

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut tree = self.tree.borrow_mut();
        tree.nodes.push(Node::new(tag));
        NodeId(tree.nodes.len() - 1)
    }

    /// Create a detached element that carries its own text.
    pub fn create_element_with_text(&self, tag: &str, text: impl Into<String>) -> NodeId {
        let id = self.create_element(tag);
        self.set_text(id, text);
        id
    }

    /// Whether `node` was created by this document.
    pub fn exists(&self, node: NodeId) -> bool {
        self.tree.borrow().node(node).is_some()
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        for id in [parent, child] {
            if tree.node(id).is_none() {
                return Err(DomError::UnknownNode(id));
            }
        }
        if tree.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if let Some(old) = tree.node(child).and_then(|n| n.parent) {
            if let Some(old) = tree.node_mut(old) {
                old.children.retain(|&c| c != child);
            }
        }
        if let Some(node) = tree.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = tree.node_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Detach `node` (and its subtree) from its parent.
    ///
    /// If the focused element was inside the removed subtree, focus falls back
    /// to the body.
    pub fn remove(&self, node: NodeId) {
        let mut tree = self.tree.borrow_mut();
        let Some(parent) = tree.node(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = tree.node_mut(parent) {
            p.children.retain(|&c| c != node);
        }
        if let Some(n) = tree.node_mut(node) {
            n.parent = None;
        }
        if let Some(focused) = tree.focused {
            if tree.contains(node, focused) {
                tree.focused = None;
            }
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.tree.borrow().node(node).map(|n| n.tag.clone())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.borrow().node(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .borrow()
            .node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.attributes.insert(name.to_owned(), value.into());
        }
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.attributes.remove(name);
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree
            .borrow()
            .node(node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.tree
            .borrow()
            .node(node)
            .is_some_and(|n| n.attributes.contains_key(name))
    }

    /// Replace the element's own text (children keep theirs).
    pub fn set_text(&self, node: NodeId, text: impl Into<String>) {
        if let Some(n) = self.tree.borrow_mut().node_mut(node) {
            n.text = text.into();
        }
    }

    /// Concatenated text of the element and all descendants, in document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.tree.borrow().collect_text(node, &mut out);
        out
    }

    /// Native disabled state, backed by the `disabled` attribute.
    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.has_attribute(node, "disabled")
    }

    pub fn set_disabled(&self, node: NodeId, disabled: bool) {
        if disabled {
            self.set_attribute(node, "disabled", "");
        } else {
            self.remove_attribute(node, "disabled");
        }
    }

    /// Inclusive descendant check: a node contains itself.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.tree.borrow().contains(ancestor, node)
    }

    /// Whether the node is attached under the body.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(BODY, node)
    }

    /// The node after `node` in document order, staying strictly inside
    /// `root`. Passing `root` itself yields its first child.
    pub fn next_in_order(&self, node: NodeId, root: NodeId) -> Option<NodeId> {
        let tree = self.tree.borrow();
        if !tree.contains(root, node) {
            return None;
        }
        if let Some(&first) = tree.node(node)?.children.first() {
            return Some(first);
        }
        let mut cursor = node;
        while cursor != root {
            if let Some(next) = tree.sibling(cursor, 1) {
                return Some(next);
            }
            cursor = tree.node(cursor)?.parent?;
        }
        None
    }

    /// The node before `node` in document order, staying strictly inside
    /// `root` (the root itself is never returned).
    pub fn prev_in_order(&self, node: NodeId, root: NodeId) -> Option<NodeId> {
        let tree = self.tree.borrow();
        if node == root || !tree.contains(root, node) {
            return None;
        }
        if let Some(prev) = tree.sibling(node, -1) {
            return Some(tree.deepest_last(prev));
        }
        let parent = tree.node(node)?.parent?;
        (parent != root).then_some(parent)
    }

    /// The last descendant of `root` in document order.
    pub fn last_descendant(&self, root: NodeId) -> Option<NodeId> {
        let tree = self.tree.borrow();
        let last = tree.deepest_last(root);
        (last != root).then_some(last)
    }

    /// All descendants of `root` in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = root;
        while let Some(next) = self.next_in_order(cursor, root) {
            out.push(next);
            cursor = next;
        }
        out
    }

    /// Descendants of `root` accepted by `filter`, in document order.
    pub fn query_all(
        &self,
        root: NodeId,
        filter: impl Fn(&Document, NodeId) -> bool,
    ) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&node| filter(self, node))
            .collect()
    }

    /// Move focus to `node`. Detached or unknown nodes are ignored.
    pub fn focus(&self, node: NodeId) -> bool {
        if !self.exists(node) || !self.is_connected(node) {
            log::trace!("ignoring focus request for disconnected node {node:?}");
            return false;
        }
        self.tree.borrow_mut().focused = Some(node);
        true
    }

    pub fn blur(&self) {
        self.tree.borrow_mut().focused = None;
    }

    /// The focused element, or the body when nothing has focus.
    pub fn active_element(&self) -> NodeId {
        self.tree.borrow().focused.unwrap_or(BODY)
    }

    pub fn has_focus(&self, node: NodeId) -> bool {
        self.tree.borrow().focused == Some(node)
    }

    /// Whether the element can receive focus from a pointer or script.
    pub fn is_focusable(&self, node: NodeId) -> bool {
        if node == BODY || !self.is_connected(node) || self.is_disabled(node) {
            return false;
        }
        self.has_attribute(node, "tabindex") || self.is_natively_focusable(node)
    }

    /// Connected elements reachable with Tab, in document order.
    pub fn tab_order(&self) -> Vec<NodeId> {
        self.query_all(BODY, |doc, node| {
            if !doc.is_focusable(node) {
                return false;
            }
            match doc.attribute(node, "tabindex") {
                Some(index) => index.trim().parse::<i32>().map_or(true, |i| i >= 0),
                None => true,
            }
        })
    }

    fn is_natively_focusable(&self, node: NodeId) -> bool {
        matches!(
            self.tag(node).as_deref(),
            Some("button" | "input" | "select" | "textarea" | "a")
        )
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree.borrow();
        f.debug_struct("Document")
            .field("nodes", &tree.nodes.len())
            .field("focused", &tree.focused)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(doc: &Document, labels: &[&str]) -> (NodeId, Vec<NodeId>) {
        let root = doc.create_element("menu");
        doc.append_child(doc.body(), root).unwrap();
        let items = labels
            .iter()
            .map(|label| {
                let item = doc.create_element_with_text("li", *label);
                doc.append_child(root, item).unwrap();
                item
            })
            .collect();
        (root, items)
    }

    #[test]
    fn append_and_children() {
        let doc = Document::new();
        let (root, items) = list(&doc, &["a", "b"]);
        assert_eq!(doc.children(root), items);
        assert_eq!(doc.parent(items[0]), Some(root));
        assert!(doc.is_connected(items[1]));
    }

    #[test]
    fn append_moves_between_parents() {
        let doc = Document::new();
        let (a, items) = list(&doc, &["x"]);
        let b = doc.create_element("div");
        doc.append_child(doc.body(), b).unwrap();
        doc.append_child(b, items[0]).unwrap();
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), items);
    }

    #[test]
    fn append_rejects_cycles() {
        let doc = Document::new();
        let (root, items) = list(&doc, &["a"]);
        assert_eq!(
            doc.append_child(items[0], root),
            Err(DomError::HierarchyRequest {
                parent: items[0],
                child: root
            })
        );
        assert!(doc.append_child(root, root).is_err());
    }

    #[test]
    fn append_rejects_foreign_nodes() {
        let doc = Document::new();
        let other = Document::new();
        let foreign = {
            for _ in 0..5 {
                other.create_element("div");
            }
            other.create_element("div")
        };
        assert_eq!(
            doc.append_child(doc.body(), foreign),
            Err(DomError::UnknownNode(foreign))
        );
    }

    #[test]
    fn text_content_is_recursive() {
        let doc = Document::new();
        let outer = doc.create_element_with_text("li", "  ");
        let inner = doc.create_element_with_text("button", "Save");
        doc.append_child(outer, inner).unwrap();
        assert_eq!(doc.text_content(outer), "  Save");
    }

    #[test]
    fn document_order_walk() {
        let doc = Document::new();
        let (root, items) = list(&doc, &["a", "b"]);
        let nested = doc.create_element("span");
        doc.append_child(items[0], nested).unwrap();

        assert_eq!(doc.next_in_order(root, root), Some(items[0]));
        assert_eq!(doc.next_in_order(items[0], root), Some(nested));
        assert_eq!(doc.next_in_order(nested, root), Some(items[1]));
        assert_eq!(doc.next_in_order(items[1], root), None);

        assert_eq!(doc.prev_in_order(items[1], root), Some(nested));
        assert_eq!(doc.prev_in_order(nested, root), Some(items[0]));
        assert_eq!(doc.prev_in_order(items[0], root), None);
        assert_eq!(doc.last_descendant(root), Some(items[1]));
        assert_eq!(doc.descendants(root), vec![items[0], nested, items[1]]);
    }

    #[test]
    fn walk_outside_root_yields_nothing() {
        let doc = Document::new();
        let (root, items) = list(&doc, &["a"]);
        doc.remove(items[0]);
        assert_eq!(doc.next_in_order(items[0], root), None);
        assert_eq!(doc.prev_in_order(items[0], root), None);
    }

    #[test]
    fn removing_focused_subtree_resets_focus() {
        let doc = Document::new();
        let (root, items) = list(&doc, &["a"]);
        assert!(doc.focus(items[0]));
        assert_eq!(doc.active_element(), items[0]);
        doc.remove(root);
        assert_eq!(doc.active_element(), doc.body());
        assert!(!doc.focus(items[0]));
    }

    #[test]
    fn disabled_flag() {
        let doc = Document::new();
        let (_, items) = list(&doc, &["a"]);
        doc.set_disabled(items[0], true);
        assert!(doc.is_disabled(items[0]));
        doc.set_disabled(items[0], false);
        assert!(!doc.is_disabled(items[0]));
    }

    #[test]
    fn tab_order_skips_negative_tabindex() {
        let doc = Document::new();
        let button = doc.create_element("button");
        let menu = doc.create_element("menu");
        let item = doc.create_element("li");
        doc.append_child(doc.body(), button).unwrap();
        doc.append_child(doc.body(), menu).unwrap();
        doc.append_child(menu, item).unwrap();
        doc.set_attribute(menu, "tabindex", "0");
        doc.set_attribute(item, "tabindex", "-1");

        assert_eq!(doc.tab_order(), vec![button, menu]);
        assert!(doc.is_focusable(item));
    }
}
