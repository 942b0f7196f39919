use crate::dom::{Document, NodeId};
use crossterm::event::{KeyCode, KeyEvent};

/// What happened to an element.
///
/// Key payloads are plain [`crossterm::event::KeyEvent`]s, so handlers can
/// match on key codes and modifiers with the full crossterm API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A key went down while the target had focus.
    KeyDown(KeyEvent),
    /// A key was released while the target had focus.
    KeyUp(KeyEvent),
    /// The target was activated (pointer click or synthesized activation).
    Click,
    /// A pointer button went down over the target.
    PointerDown,
    /// The pointer moved onto the target.
    PointerEnter,
    /// The pointer left the target.
    PointerLeave,
}

/// An event dispatched at an element of a [`Document`].
///
/// Handlers receive the event mutably and may call
/// [`prevent_default`](DomEvent::prevent_default) to suppress the host's
/// [`DefaultAction`], or [`stop_propagation`](DomEvent::stop_propagation) to
/// tell enclosing handlers the event was consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    pub kind: EventKind,
    pub target: NodeId,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn key_down(target: NodeId, key: KeyEvent) -> Self {
        Self::new(EventKind::KeyDown(key), target)
    }

    pub fn key_up(target: NodeId, key: KeyEvent) -> Self {
        Self::new(EventKind::KeyUp(key), target)
    }

    pub fn click(target: NodeId) -> Self {
        Self::new(EventKind::Click, target)
    }

    pub fn pointer_down(target: NodeId) -> Self {
        Self::new(EventKind::PointerDown, target)
    }

    /// The key payload of a key-down or key-up event.
    pub fn key(&self) -> Option<&KeyEvent> {
        match &self.kind {
            EventKind::KeyDown(key) | EventKind::KeyUp(key) => Some(key),
            _ => None,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Host behaviour that follows an event unless a handler prevented it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultAction {
    /// Move focus to the given element.
    MoveFocus(NodeId),
    /// Dispatch a follow-up event (an activation click).
    Dispatch(DomEvent),
}

/// Work out the default action for an already-dispatched event.
///
/// * Tab / Shift+Tab move focus through [`Document::tab_order`], wrapping.
/// * Enter key-down and Space key-up on a button synthesize a click.
/// * Pointer-down on a focusable element focuses it.
pub fn default_action(doc: &Document, event: &DomEvent) -> Option<DefaultAction> {
    if event.default_prevented() {
        return None;
    }
    let target = event.target;
    match &event.kind {
        EventKind::KeyDown(key) if matches!(key.code, KeyCode::Tab | KeyCode::BackTab) => {
            let order = doc.tab_order();
            if order.is_empty() {
                return None;
            }
            let backwards = key.code == KeyCode::BackTab
                || key
                    .modifiers
                    .contains(crossterm::event::KeyModifiers::SHIFT);
            let next = match order.iter().position(|&n| n == target) {
                Some(i) if backwards => (i + order.len() - 1) % order.len(),
                Some(i) => (i + 1) % order.len(),
                None if backwards => order.len() - 1,
                None => 0,
            };
            Some(DefaultAction::MoveFocus(order[next]))
        }
        EventKind::KeyDown(key) if key.code == KeyCode::Enter && is_button(doc, target) => {
            Some(DefaultAction::Dispatch(DomEvent::click(target)))
        }
        EventKind::KeyUp(key) if key.code == KeyCode::Char(' ') && is_button(doc, target) => {
            Some(DefaultAction::Dispatch(DomEvent::click(target)))
        }
        EventKind::PointerDown if doc.is_focusable(target) => {
            Some(DefaultAction::MoveFocus(target))
        }
        _ => None,
    }
}

fn is_button(doc: &Document, node: NodeId) -> bool {
    !doc.is_disabled(node)
        && (doc.tag(node).as_deref() == Some("button")
            || doc.attribute(node, "role").as_deref() == Some("button"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn two_buttons() -> (Document, NodeId, NodeId) {
        let doc = Document::new();
        let a = doc.create_element("button");
        let b = doc.create_element("button");
        doc.append_child(doc.body(), a).unwrap();
        doc.append_child(doc.body(), b).unwrap();
        (doc, a, b)
    }

    #[test]
    fn flags_start_clear() {
        let mut ev = DomEvent::click(Document::new().body());
        assert!(!ev.default_prevented());
        assert!(!ev.propagation_stopped());
        ev.prevent_default();
        ev.stop_propagation();
        assert!(ev.default_prevented());
        assert!(ev.propagation_stopped());
    }

    #[test]
    fn tab_moves_focus_and_wraps() {
        let (doc, a, b) = two_buttons();
        let ev = DomEvent::key_down(a, key(KeyCode::Tab));
        assert_eq!(default_action(&doc, &ev), Some(DefaultAction::MoveFocus(b)));
        let ev = DomEvent::key_down(b, key(KeyCode::Tab));
        assert_eq!(default_action(&doc, &ev), Some(DefaultAction::MoveFocus(a)));
        let ev = DomEvent::key_down(a, key(KeyCode::BackTab));
        assert_eq!(default_action(&doc, &ev), Some(DefaultAction::MoveFocus(b)));
    }

    #[test]
    fn prevented_events_have_no_default() {
        let (doc, a, _) = two_buttons();
        let mut ev = DomEvent::key_down(a, key(KeyCode::Tab));
        ev.prevent_default();
        assert_eq!(default_action(&doc, &ev), None);
    }

    #[test]
    fn enter_and_space_activate_buttons() {
        let (doc, a, _) = two_buttons();
        let down = DomEvent::key_down(a, key(KeyCode::Enter));
        assert_eq!(
            default_action(&doc, &down),
            Some(DefaultAction::Dispatch(DomEvent::click(a)))
        );
        let up = DomEvent::key_up(a, key(KeyCode::Char(' ')));
        assert_eq!(
            default_action(&doc, &up),
            Some(DefaultAction::Dispatch(DomEvent::click(a)))
        );
        let space_down = DomEvent::key_down(a, key(KeyCode::Char(' ')));
        assert_eq!(default_action(&doc, &space_down), None);
    }

    #[test]
    fn pointer_down_focuses_focusable_targets_only() {
        let (doc, a, _) = two_buttons();
        assert_eq!(
            default_action(&doc, &DomEvent::pointer_down(a)),
            Some(DefaultAction::MoveFocus(a))
        );
        assert_eq!(
            default_action(&doc, &DomEvent::pointer_down(doc.body())),
            None
        );
    }
}
