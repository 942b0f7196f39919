//! Two-state toggle button.
//!
//! [`Toggle`] turns a button element into a pressed/unpressed switch. It
//! never flips its own state: clicks and Space emit
//! [`Message::Change`] with the requested value, and the state changes once
//! that message reaches [`Toggle::update`] (or the parent calls
//! [`Toggle::set_pressed`]). A parent that wants to veto a change simply
//! does not forward it.
//!
//! Enter does not toggle. Its key-down is prevented so the host does not
//! turn it into a click.

use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use shui_core::command::Command;
use shui_core::component::Component;
use shui_core::dom::{Document, NodeId};
use shui_core::event::{DomEvent, EventKind};

use crate::runeutil::{sanitize, truncate};

/// Messages for the toggle component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// The user asked for this pressed state.
    Change(bool),
}

/// Style configuration for the toggle.
#[derive(Debug, Clone)]
pub struct ToggleStyle {
    pub off: Style,
    pub on: Style,
    /// Added on top of `on`/`off` while the element has focus.
    pub focused: Style,
}

impl Default for ToggleStyle {
    fn default() -> Self {
        Self {
            off: Style::default(),
            on: Style::default().fg(Color::Green),
            focused: Style::default().add_modifier(Modifier::BOLD),
        }
    }
}

/// A toggle bound to one element.
pub struct Toggle {
    document: Document,
    node: Option<NodeId>,
    pressed: bool,
    style: ToggleStyle,
}

impl Toggle {
    /// Bind `node` and reflect `pressed` into `aria-pressed`.
    ///
    /// Elements that are not native buttons should carry `role="button"`.
    pub fn attach(document: Document, node: NodeId, pressed: bool) -> Self {
        let mut toggle = Self {
            document,
            node: Some(node),
            pressed,
            style: ToggleStyle::default(),
        };
        toggle.set_pressed(pressed);
        toggle
    }

    /// Set the style configuration.
    pub fn with_style(mut self, style: ToggleStyle) -> Self {
        self.style = style;
        self
    }

    pub fn pressed(&self) -> bool {
        self.pressed
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Record a new pressed state and reflect it into `aria-pressed`.
    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
        if let Some(node) = self.node {
            self.document
                .set_attribute(node, "aria-pressed", pressed.to_string());
        }
    }

    /// Stop handling events. The element keeps its last `aria-pressed`.
    pub fn destroy(&mut self) {
        if let Some(node) = self.node.take() {
            log::debug!("toggle released from {node:?}");
        }
    }

    fn request(&self) -> Command<Message> {
        Command::message(Message::Change(!self.pressed))
    }
}

impl Component for Toggle {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Change(pressed) => self.set_pressed(pressed),
        }
        Command::none()
    }

    fn event(&mut self, event: &mut DomEvent) -> Command<Message> {
        let Some(node) = self.node else {
            return Command::none();
        };
        if !self.document.contains(node, event.target) {
            return Command::none();
        }
        match event.kind.clone() {
            EventKind::Click => {
                event.prevent_default();
                self.request()
            }
            EventKind::KeyUp(key) => {
                if key.code != KeyCode::Tab {
                    event.prevent_default();
                }
                if key.code == KeyCode::Char(' ') {
                    self.request()
                } else {
                    Command::none()
                }
            }
            EventKind::KeyDown(key) if key.code == KeyCode::Enter => {
                event.prevent_default();
                Command::none()
            }
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let mut style = if self.pressed {
            self.style.on
        } else {
            self.style.off
        };
        if self.focused() {
            style = style.patch(self.style.focused);
        }
        let mark = if self.pressed { "[x] " } else { "[ ] " };
        let label = self
            .node
            .map(|node| sanitize(self.document.text_content(node).trim()))
            .unwrap_or_default();
        let text = truncate(&format!("{mark}{label}"), area.width as usize, "…");
        frame.render_widget(
            Paragraph::new(Span::styled(text, style)),
            Rect { height: 1, ..area },
        );
    }

    fn focused(&self) -> bool {
        self.node.is_some_and(|node| self.document.has_focus(node))
    }
}
