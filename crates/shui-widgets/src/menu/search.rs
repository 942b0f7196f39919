use super::is_enabled_item;
use crate::runeutil::match_key;
use shui_core::dom::{Document, NodeId};

/// Type-ahead buffer.
///
/// Every pushed character starts a new generation. A pending clear only
/// takes effect if it carries the current generation, so a later keystroke
/// supersedes every clear scheduled before it.
#[derive(Debug, Clone, Default)]
pub struct TypeAhead {
    query: String,
    generation: u64,
}

impl TypeAhead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a character (lowercased) and return the new generation.
    pub fn push(&mut self, ch: char) -> u64 {
        self.query.extend(ch.to_lowercase());
        self.generation += 1;
        self.generation
    }

    /// Clear the buffer if `generation` is still current.
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.query.clear();
        true
    }

    /// Clear now and invalidate every pending expiry.
    pub fn clear(&mut self) {
        self.query.clear();
        self.generation += 1;
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// First enabled item under `container` whose label starts with `query`.
///
/// Labels are compared trimmed and lowercased; `query` is expected to be
/// lowercase already.
pub fn find_match(doc: &Document, container: NodeId, query: &str) -> Option<NodeId> {
    if query.is_empty() {
        return None;
    }
    doc.query_all(container, is_enabled_item)
        .into_iter()
        .find(|&item| match_key(&doc.text_content(item)).starts_with(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(labels: &[&str]) -> (Document, NodeId, Vec<NodeId>) {
        let doc = Document::new();
        let container = doc.create_element("menu");
        doc.append_child(doc.body(), container).unwrap();
        let items = labels
            .iter()
            .map(|label| {
                let item = doc.create_element_with_text("li", *label);
                doc.set_attribute(item, "role", "menuitem");
                doc.append_child(container, item).unwrap();
                item
            })
            .collect();
        (doc, container, items)
    }

    #[test]
    fn push_lowercases_and_bumps_generation() {
        let mut search = TypeAhead::new();
        assert_eq!(search.push('S'), 1);
        assert_eq!(search.push('e'), 2);
        assert_eq!(search.query(), "se");
        assert!(search.is_active());
    }

    #[test]
    fn stale_expiry_is_ignored() {
        let mut search = TypeAhead::new();
        let first = search.push('a');
        let second = search.push('b');
        assert!(!search.expire(first));
        assert_eq!(search.query(), "ab");
        assert!(search.expire(second));
        assert!(!search.is_active());
    }

    #[test]
    fn clear_invalidates_pending_expiry() {
        let mut search = TypeAhead::new();
        let generation = search.push('a');
        search.clear();
        search.push('b');
        assert!(!search.expire(generation));
        assert_eq!(search.query(), "b");
    }

    #[test]
    fn matches_trimmed_case_insensitive_prefix() {
        let (doc, container, items) = menu(&["  Open ", "Settings", "Search"]);
        assert_eq!(find_match(&doc, container, "se"), Some(items[1]));
        assert_eq!(find_match(&doc, container, "sea"), Some(items[2]));
        assert_eq!(find_match(&doc, container, "open"), Some(items[0]));
        assert_eq!(find_match(&doc, container, "x"), None);
    }

    #[test]
    fn skips_disabled_items() {
        let (doc, container, items) = menu(&["Settings", "Search"]);
        doc.set_disabled(items[0], true);
        assert_eq!(find_match(&doc, container, "se"), Some(items[1]));
    }
}
