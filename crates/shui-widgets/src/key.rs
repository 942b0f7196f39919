//! Key binding definitions and the key map trait used to list them.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;

/// A key binding that maps one or more key combinations to a described action.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The set of key combinations that trigger this binding.
    pub keys: Vec<KeyCombination>,
    /// A human-readable description of the action this binding performs.
    pub description: String,
    /// Whether this binding is currently active. Disabled bindings never match.
    pub enabled: bool,
}

/// A single key press with optional modifier keys (Ctrl, Alt, Shift).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombination {
    /// The base key code (e.g. a character, arrow key, or function key).
    pub code: KeyCode,
    /// Modifier keys that must be held alongside the base key.
    pub modifiers: KeyModifiers,
}

impl Binding {
    /// Create a new binding for a single key combination with the given description.
    pub fn new(key: KeyCombination, description: impl Into<String>) -> Self {
        Self {
            keys: vec![key],
            description: description.into(),
            enabled: true,
        }
    }

    /// Create a new binding for multiple key combinations with the given description.
    pub fn with_keys(keys: Vec<KeyCombination>, description: impl Into<String>) -> Self {
        Self {
            keys,
            description: description.into(),
            enabled: true,
        }
    }

    /// Return whether the given key event matches any of this binding's key combinations.
    /// Always returns `false` when the binding is disabled.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if !self.enabled {
            return false;
        }
        self.keys
            .iter()
            .any(|k| k.code == event.code && event.modifiers.contains(k.modifiers))
    }

    /// Set whether this binding is enabled. Disabled bindings never match key events.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The bound keys joined for display, e.g. `"home/pgup"`.
    pub fn keys_label(&self) -> String {
        self.keys
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl KeyCombination {
    /// Create a key combination with no modifier keys.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Create a key combination with the Shift modifier.
    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    /// Create a key combination with an explicit set of modifier keys.
    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Up => f.write_str("↑"),
            KeyCode::Down => f.write_str("↓"),
            KeyCode::Left => f.write_str("←"),
            KeyCode::Right => f.write_str("→"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::BackTab => f.write_str("shift+tab"),
            KeyCode::Home => f.write_str("home"),
            KeyCode::End => f.write_str("end"),
            KeyCode::PageUp => f.write_str("pgup"),
            KeyCode::PageDown => f.write_str("pgdn"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Trait for types that define key bindings, so they can be listed in help
/// output.
pub trait KeyMap {
    /// Return a flat list of the most important bindings for the short help line.
    fn short_help(&self) -> Vec<&Binding>;
    /// Return bindings grouped by category for the full help overlay.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}
