use crate::key::{Binding, KeyCombination, KeyMap};
use crossterm::event::{KeyCode, KeyEvent};

/// What a key-down on the trigger button asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// Open and highlight the first enabled item.
    OpenFirst,
    /// Open and highlight the last enabled item.
    OpenLast,
}

/// What a key-down inside the open menu asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Next,
    Prev,
    First,
    Last,
    Activate,
    Close,
    /// Tab out of the menu: close without moving focus onward.
    Leave,
}

/// Configurable key bindings for [`Menu`](super::Menu).
///
/// Each field is a [`Binding`] that maps one or more key combinations to an
/// action. The defaults follow the WAI-ARIA menu-button keyboard pattern.
/// Override individual fields to customise keys:
///
/// ```ignore
/// use shui_widgets::menu::MenuKeyBindings;
/// use shui_widgets::key::{Binding, KeyCombination};
/// use crossterm::event::KeyCode;
///
/// let mut bindings = MenuKeyBindings::default();
/// bindings.close = Binding::with_keys(
///     vec![KeyCombination::new(KeyCode::Esc), KeyCombination::new(KeyCode::Char('q'))],
///     "Close",
/// );
/// ```
///
/// Characters not claimed by a binding feed type-ahead search.
#[derive(Debug, Clone)]
pub struct MenuKeyBindings {
    /// Open from the button, first item highlighted. Default: Space, Enter, Down
    pub open_first: Binding,
    /// Open from the button, last item highlighted. Default: Up
    pub open_last: Binding,
    /// Next enabled item, wrapping. Default: Down
    pub next: Binding,
    /// Previous enabled item, wrapping. Default: Up
    pub prev: Binding,
    /// First enabled item. Default: Home, PageUp
    pub first: Binding,
    /// Last enabled item. Default: End, PageDown
    pub last: Binding,
    /// Activate the highlighted item and close. Default: Enter, Space
    pub activate: Binding,
    /// Close. Default: Esc
    pub close: Binding,
    /// Close when tabbing away. Default: Tab, Shift+Tab
    pub leave: Binding,
}

impl Default for MenuKeyBindings {
    fn default() -> Self {
        Self {
            open_first: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Char(' ')),
                    KeyCombination::new(KeyCode::Enter),
                    KeyCombination::new(KeyCode::Down),
                ],
                "Open menu",
            ),
            open_last: Binding::new(KeyCombination::new(KeyCode::Up), "Open at last item"),
            next: Binding::new(KeyCombination::new(KeyCode::Down), "Next"),
            prev: Binding::new(KeyCombination::new(KeyCode::Up), "Previous"),
            first: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Home),
                    KeyCombination::new(KeyCode::PageUp),
                ],
                "First",
            ),
            last: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::End),
                    KeyCombination::new(KeyCode::PageDown),
                ],
                "Last",
            ),
            activate: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Enter),
                    KeyCombination::new(KeyCode::Char(' ')),
                ],
                "Choose",
            ),
            close: Binding::new(KeyCombination::new(KeyCode::Esc), "Close"),
            leave: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Tab),
                    KeyCombination::new(KeyCode::BackTab),
                ],
                "Leave",
            ),
        }
    }
}

impl MenuKeyBindings {
    /// Resolve a key-down on the trigger button.
    pub fn button_action(&self, key: &KeyEvent) -> Option<ButtonAction> {
        if self.open_first.matches(key) {
            Some(ButtonAction::OpenFirst)
        } else if self.open_last.matches(key) {
            Some(ButtonAction::OpenLast)
        } else {
            None
        }
    }

    /// Resolve a key-down inside the menu container.
    pub fn menu_action(&self, key: &KeyEvent) -> Option<MenuAction> {
        [
            (&self.next, MenuAction::Next),
            (&self.prev, MenuAction::Prev),
            (&self.first, MenuAction::First),
            (&self.last, MenuAction::Last),
            (&self.activate, MenuAction::Activate),
            (&self.close, MenuAction::Close),
            (&self.leave, MenuAction::Leave),
        ]
        .into_iter()
        .find(|(binding, _)| binding.matches(key))
        .map(|(_, action)| action)
    }
}

impl KeyMap for MenuKeyBindings {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.next, &self.prev, &self.activate, &self.close]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.open_first, &self.open_last],
            vec![&self.next, &self.prev, &self.first, &self.last],
            vec![&self.activate, &self.close, &self.leave],
        ]
    }
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

    #[test]
    fn button_keys() {
        let b = MenuKeyBindings::default();
        for code in [KeyCode::Char(' '), KeyCode::Enter, KeyCode::Down] {
            assert_eq!(b.button_action(&key(code)), Some(ButtonAction::OpenFirst));
        }
        assert_eq!(b.button_action(&key(KeyCode::Up)), Some(ButtonAction::OpenLast));
        assert_eq!(b.button_action(&key(KeyCode::Esc)), None);
    }

    #[test]
    fn menu_keys() {
        let b = MenuKeyBindings::default();
        let cases = [
            (KeyCode::Down, MenuAction::Next),
            (KeyCode::Up, MenuAction::Prev),
            (KeyCode::Home, MenuAction::First),
            (KeyCode::PageUp, MenuAction::First),
            (KeyCode::End, MenuAction::Last),
            (KeyCode::PageDown, MenuAction::Last),
            (KeyCode::Enter, MenuAction::Activate),
            (KeyCode::Char(' '), MenuAction::Activate),
            (KeyCode::Esc, MenuAction::Close),
            (KeyCode::Tab, MenuAction::Leave),
            (KeyCode::BackTab, MenuAction::Leave),
        ];
        for (code, action) in cases {
            assert_eq!(b.menu_action(&key(code)), Some(action), "{code:?}");
        }
        assert_eq!(b.menu_action(&key(KeyCode::Char('a'))), None);
    }

    #[test]
    fn rebinding_replaces_default() {
        let mut b = MenuKeyBindings::default();
        b.close = Binding::new(KeyCombination::new(KeyCode::Char('q')), "Close");
        assert_eq!(b.menu_action(&key(KeyCode::Esc)), None);
        assert_eq!(b.menu_action(&key(KeyCode::Char('q'))), Some(MenuAction::Close));
    }
}
