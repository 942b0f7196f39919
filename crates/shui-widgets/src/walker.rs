//! A filtered cursor over a live subtree of a [`Document`].

use shui_core::dom::{Document, NodeId};
use std::fmt;

/// Walks the descendants of `root` in document order, stopping only at
/// nodes accepted by the filter.
///
/// Nothing is cached: every step re-reads the tree, so elements added,
/// removed or disabled between steps are seen immediately. Moves that find
/// a node update [`current`](ElementWalker::current); moves that run off
/// either end return `None` and leave it alone. The root itself is never
/// yielded.
pub struct ElementWalker<F> {
    document: Document,
    root: NodeId,
    current: NodeId,
    filter: F,
}

impl<F> ElementWalker<F>
where
    F: Fn(&Document, NodeId) -> bool,
{
    /// Create a walker positioned at `root`.
    pub fn new(document: Document, root: NodeId, filter: F) -> Self {
        Self {
            document,
            root,
            current: root,
            filter,
        }
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Reposition the cursor. Any node is accepted, including ones outside
    /// the root, from which no move succeeds.
    pub fn set_current(&mut self, node: NodeId) {
        self.current = node;
    }

    /// Step to the next accepted node after the cursor.
    pub fn next_node(&mut self) -> Option<NodeId> {
        let found = self.scan(self.current, |doc, node, root| doc.next_in_order(node, root))?;
        self.current = found;
        Some(found)
    }

    /// Step to the closest accepted node before the cursor.
    pub fn previous_node(&mut self) -> Option<NodeId> {
        let found = self.scan(self.current, |doc, node, root| doc.prev_in_order(node, root))?;
        self.current = found;
        Some(found)
    }

    /// Move to the first accepted node under the root.
    pub fn first(&mut self) -> Option<NodeId> {
        let found = self.scan(self.root, |doc, node, root| doc.next_in_order(node, root))?;
        self.current = found;
        Some(found)
    }

    /// Move to the last accepted node under the root.
    pub fn last(&mut self) -> Option<NodeId> {
        let last = self.document.last_descendant(self.root)?;
        let found = if self.accepts(last) {
            last
        } else {
            self.scan(last, |doc, node, root| doc.prev_in_order(node, root))?
        };
        self.current = found;
        Some(found)
    }

    fn accepts(&self, node: NodeId) -> bool {
        (self.filter)(&self.document, node)
    }

    fn scan(
        &self,
        from: NodeId,
        step: impl Fn(&Document, NodeId, NodeId) -> Option<NodeId>,
    ) -> Option<NodeId> {
        let mut cursor = from;
        loop {
            cursor = step(&self.document, cursor, self.root)?;
            if self.accepts(cursor) {
                return Some(cursor);
            }
        }
    }
}

impl<F> fmt::Debug for ElementWalker<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementWalker")
            .field("root", &self.root)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_item(doc: &Document, node: NodeId) -> bool {
        doc.attribute(node, "role").as_deref() == Some("menuitem") && !doc.is_disabled(node)
    }

    /// `<ul><li>a</li><li>b</li><li>c</li></ul>` with every `li` a menu item.
    fn fixture() -> (Document, NodeId, Vec<NodeId>) {
        let doc = Document::new();
        let root = doc.create_element("ul");
        doc.append_child(doc.body(), root).unwrap();
        let items: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|label| {
                let li = doc.create_element_with_text("li", *label);
                doc.set_attribute(li, "role", "menuitem");
                doc.append_child(root, li).unwrap();
                li
            })
            .collect();
        (doc, root, items)
    }

    #[test]
    fn walks_forward_and_stops_at_end() {
        let (doc, root, items) = fixture();
        let mut walker = ElementWalker::new(doc, root, enabled_item);
        assert_eq!(walker.next_node(), Some(items[0]));
        assert_eq!(walker.next_node(), Some(items[1]));
        assert_eq!(walker.next_node(), Some(items[2]));
        assert_eq!(walker.next_node(), None);
        assert_eq!(walker.current(), items[2]);
    }

    #[test]
    fn walks_backward_and_never_yields_root() {
        let (doc, root, items) = fixture();
        let mut walker = ElementWalker::new(doc, root, |_: &Document, _| true);
        walker.set_current(items[1]);
        // li text has no element children, so the previous node is items[0]
        assert_eq!(walker.previous_node(), Some(items[0]));
        assert_eq!(walker.previous_node(), None);
        assert_eq!(walker.current(), items[0]);
    }

    #[test]
    fn skips_rejected_nodes() {
        let (doc, root, items) = fixture();
        doc.set_disabled(items[1], true);
        let mut walker = ElementWalker::new(doc, root, enabled_item);
        walker.set_current(items[0]);
        assert_eq!(walker.next_node(), Some(items[2]));
        assert_eq!(walker.previous_node(), Some(items[0]));
    }

    #[test]
    fn first_and_last_are_relative_to_root() {
        let (doc, root, items) = fixture();
        let mut walker = ElementWalker::new(doc.clone(), root, enabled_item);
        walker.set_current(items[1]);
        assert_eq!(walker.first(), Some(items[0]));
        assert_eq!(walker.last(), Some(items[2]));

        doc.set_disabled(items[2], true);
        assert_eq!(walker.last(), Some(items[1]));
    }

    #[test]
    fn last_finds_nested_items() {
        let (doc, root, items) = fixture();
        let group = doc.create_element("div");
        let trailing = doc.create_element("hr");
        doc.append_child(root, group).unwrap();
        doc.append_child(group, trailing).unwrap();
        let mut walker = ElementWalker::new(doc, root, enabled_item);
        assert_eq!(walker.last(), Some(items[2]));
    }

    #[test]
    fn empty_root_yields_nothing() {
        let doc = Document::new();
        let root = doc.create_element("ul");
        doc.append_child(doc.body(), root).unwrap();
        let mut walker = ElementWalker::new(doc, root, enabled_item);
        assert_eq!(walker.first(), None);
        assert_eq!(walker.last(), None);
        assert_eq!(walker.next_node(), None);
        assert_eq!(walker.current(), root);
    }

    #[test]
    fn sees_live_changes() {
        let (doc, root, items) = fixture();
        let mut walker = ElementWalker::new(doc.clone(), root, enabled_item);
        walker.set_current(items[2]);
        let extra = doc.create_element_with_text("li", "d");
        doc.set_attribute(extra, "role", "menuitem");
        doc.append_child(root, extra).unwrap();
        assert_eq!(walker.next_node(), Some(extra));
    }

    #[test]
    fn cursor_outside_root_goes_nowhere() {
        let (doc, root, _) = fixture();
        let stray = doc.create_element("li");
        doc.set_attribute(stray, "role", "menuitem");
        doc.append_child(doc.body(), stray).unwrap();
        let mut walker = ElementWalker::new(doc, root, enabled_item);
        walker.set_current(stray);
        assert_eq!(walker.next_node(), None);
        assert_eq!(walker.previous_node(), None);
        assert_eq!(walker.current(), stray);
    }
}
