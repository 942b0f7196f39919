//! Accessible menu button.
//!
//! A [`Menu`] binds two elements of a [`Document`]: a trigger button and a
//! container holding `role="menuitem"` elements. The parent owns both
//! elements and mounts the container while [`Menu::is_open`] is true:
//!
//! ```ignore
//! let mut menu = Menu::new(doc.clone());
//! menu.button(button);
//!
//! // after every `menu.event` / `menu.update`:
//! if menu.is_open() && container.is_none() {
//!     let list = build_list(&doc);
//!     menu.attach(list);
//!     container = Some(list);
//! } else if !menu.is_open() {
//!     if let Some(list) = container.take() {
//!         menu.detach();
//!         doc.remove(list);
//!     }
//! }
//! ```
//!
//! Keyboard focus stays on the container while the menu is open. The
//! highlighted item is announced through `aria-activedescendant` and is
//! never focused itself. Items are never cached: navigation re-reads the
//! container on every step, so items can be added, removed or disabled at
//! any time.

mod keys;
mod search;

pub use keys::{ButtonAction, MenuAction, MenuKeyBindings};
pub use search::{find_match, TypeAhead};

use crate::id::prefixed;
use crate::runeutil::{display_width, sanitize, truncate};
use crate::walker::ElementWalker;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use shui_core::command::Command;
use shui_core::component::Component;
use shui_core::dom::{Document, NodeId};
use shui_core::event::{DomEvent, EventKind};
use shui_core::store::Writable;
use shui_core::teardown::Teardown;
use std::time::Duration;

/// Whether `node` is a menu item that can be highlighted.
pub fn is_enabled_item(doc: &Document, node: NodeId) -> bool {
    is_item(doc, node) && !doc.is_disabled(node)
}

fn is_item(doc: &Document, node: NodeId) -> bool {
    doc.attribute(node, "role").as_deref() == Some("menuitem")
}

/// Which end of the item list to highlight once an open has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    First,
    Last,
}

impl Focus {
    fn index(self) -> i32 {
        match self {
            Focus::First => 1,
            Focus::Last => -1,
        }
    }
}

/// Messages for the menu component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Request to open the menu.
    Open,
    /// Request to close the menu.
    Close,
    /// The open triggered from the keyboard has been committed; focus the
    /// container and highlight an end of the list.
    Settled(Focus),
    /// The menu closed; hand focus back to the button.
    RestoreFocus,
    /// The type-ahead quiet period of the given generation elapsed.
    ClearSearch(u64),
    /// An item was chosen with Enter, Space or a click. Emitted for the
    /// parent; the menu itself ignores it.
    Activated(NodeId),
}

/// Behaviour options for [`Menu`].
#[derive(Debug, Clone)]
pub struct MenuOptions {
    /// Quiet period after which the type-ahead buffer is cleared.
    pub search_timeout: Duration,
    /// Prefix of the id given to the trigger button.
    pub button_id_prefix: String,
    /// Prefix of the id given to the container.
    pub menu_id_prefix: String,
    /// Prefix of the id given to items registered with [`Menu::item`].
    pub item_id_prefix: String,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            search_timeout: Duration::from_millis(350),
            button_id_prefix: "shui-menubutton".into(),
            menu_id_prefix: "shui-menu".into(),
            item_id_prefix: "shui-menuitem".into(),
        }
    }
}

/// Style configuration for the menu.
#[derive(Debug, Clone)]
pub struct MenuStyle {
    /// Style for the trigger button line.
    pub button: Style,
    /// Style for the trigger button line while the menu is open.
    pub button_open: Style,
    /// Style for enabled, unhighlighted items.
    pub item: Style,
    /// Style for the highlighted item.
    pub selected_item: Style,
    /// Style for disabled items.
    pub disabled_item: Style,
    /// Style for the list border.
    pub border: Style,
}

impl Default for MenuStyle {
    fn default() -> Self {
        Self {
            button: Style::default().add_modifier(Modifier::BOLD),
            button_open: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            item: Style::default(),
            selected_item: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            disabled_item: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::DarkGray),
        }
    }
}

struct ButtonBinding {
    node: NodeId,
    id: String,
    teardown: Teardown,
}

struct ContainerBinding {
    node: NodeId,
    walker: ElementWalker<fn(&Document, NodeId) -> bool>,
    teardown: Teardown,
}

/// A keyboard-navigable dropdown menu bound to a button and a container.
///
/// Menu operations never fail: calls that need an element that is not
/// bound are no-ops.
pub struct Menu {
    document: Document,
    options: MenuOptions,
    style: MenuStyle,
    bindings: MenuKeyBindings,
    open: Writable<bool>,
    selected: Writable<Option<NodeId>>,
    button: Option<ButtonBinding>,
    container: Option<ContainerBinding>,
    search: TypeAhead,
}

impl Menu {
    /// Create a closed menu with nothing bound.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            options: MenuOptions::default(),
            style: MenuStyle::default(),
            bindings: MenuKeyBindings::default(),
            open: Writable::new(false),
            selected: Writable::new(None),
            button: None,
            container: None,
            search: TypeAhead::new(),
        }
    }

    /// Set the behaviour options.
    pub fn with_options(mut self, options: MenuOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the style configuration.
    pub fn with_style(mut self, style: MenuStyle) -> Self {
        self.style = style;
        self
    }

    /// Set custom key bindings.
    pub fn with_bindings(mut self, bindings: MenuKeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn bindings(&self) -> &MenuKeyBindings {
        &self.bindings
    }

    // -- binding --------------------------------------------------------

    /// Bind the trigger button.
    ///
    /// Sets `aria-haspopup`, a generated `id`, and keeps `aria-expanded` in
    /// step with the open state. Rebinding releases the previous button.
    pub fn button(&mut self, node: NodeId) {
        self.detach_button();
        let doc = &self.document;
        let id = prefixed(&self.options.button_id_prefix);
        doc.set_attribute(node, "aria-haspopup", "true");
        doc.set_attribute(node, "id", id.as_str());

        let mut teardown = Teardown::new();
        let mirror = doc.clone();
        teardown.add_subscription(self.open.subscribe(move |open| {
            mirror.set_attribute(node, "aria-expanded", open.to_string());
        }));
        log::debug!("menu button bound to {node:?} as {id}");
        self.button = Some(ButtonBinding { node, id, teardown });
    }

    /// Release the trigger button binding.
    pub fn detach_button(&mut self) {
        if let Some(binding) = self.button.take() {
            binding.teardown.destroy();
        }
    }

    /// Bind the container the parent mounted for the open menu.
    ///
    /// Gives it a generated `id`, `role="menu"` and `tabindex="0"`, links it
    /// with the button through `aria-controls`/`aria-labelledby`, reflects
    /// the highlighted item into `aria-activedescendant`, clears the
    /// highlight and the type-ahead buffer, and focuses the container.
    pub fn attach(&mut self, container: NodeId) {
        self.detach();
        let doc = &self.document;
        let id = prefixed(&self.options.menu_id_prefix);
        doc.set_attribute(container, "id", id.as_str());

        let mut teardown = Teardown::new();
        match &self.button {
            Some(button) => {
                doc.set_attribute(button.node, "aria-controls", id.as_str());
                doc.set_attribute(container, "aria-labelledby", button.id.as_str());
                let cleanup = doc.clone();
                let button = button.node;
                teardown.add(move || cleanup.remove_attribute(button, "aria-controls"));
            }
            None => log::warn!("menu container {container:?} attached before a button was bound"),
        }
        doc.set_attribute(container, "role", "menu");
        doc.set_attribute(container, "tabindex", "0");

        let reflect = doc.clone();
        teardown.add_subscription(self.selected.subscribe(move |item| {
            match item.and_then(|item| reflect.attribute(item, "id")) {
                Some(id) => reflect.set_attribute(container, "aria-activedescendant", id),
                None => reflect.remove_attribute(container, "aria-activedescendant"),
            }
        }));

        let walker = ElementWalker::new(
            doc.clone(),
            container,
            is_enabled_item as fn(&Document, NodeId) -> bool,
        );
        doc.focus(container);
        log::debug!("menu container bound to {container:?} as {id}");
        self.container = Some(ContainerBinding {
            node: container,
            walker,
            teardown,
        });
        self.search.clear();
        self.reset(None);
    }

    /// Release the container binding. The element itself is left in place.
    pub fn detach(&mut self) {
        if let Some(binding) = self.container.take() {
            log::debug!("menu container {:?} released", binding.node);
            binding.teardown.destroy();
        }
    }

    /// Register a menu item: `role="menuitem"`, `tabindex="-1"` and a
    /// generated `id` unless it already has one.
    pub fn item(&self, node: NodeId) {
        let doc = &self.document;
        doc.set_attribute(node, "role", "menuitem");
        doc.set_attribute(node, "tabindex", "-1");
        if !doc.has_attribute(node, "id") {
            doc.set_attribute(node, "id", prefixed(&self.options.item_id_prefix));
        }
    }

    /// Release every binding and invalidate pending type-ahead timers.
    pub fn destroy(&mut self) {
        self.detach();
        self.detach_button();
        self.search.clear();
    }

    // -- state ----------------------------------------------------------

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// The open-state store. Setting it directly opens or closes the menu
    /// without any focus handling.
    pub fn open_store(&self) -> Writable<bool> {
        self.open.clone()
    }

    /// The highlighted item.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected.get()
    }

    pub fn selected_store(&self) -> Writable<Option<NodeId>> {
        self.selected.clone()
    }

    /// Whether `node` is the highlighted item.
    pub fn is_active(&self, node: NodeId) -> bool {
        self.selected.get() == Some(node)
    }

    /// The current type-ahead buffer.
    pub fn search_query(&self) -> &str {
        self.search.query()
    }

    pub fn button_node(&self) -> Option<NodeId> {
        self.button.as_ref().map(|b| b.node)
    }

    pub fn container_node(&self) -> Option<NodeId> {
        self.container.as_ref().map(|c| c.node)
    }

    // -- operations -----------------------------------------------------

    pub fn open_menu(&mut self) {
        if self.open.get() {
            return;
        }
        log::debug!("menu opened");
        self.search.clear();
        self.reset(None);
        self.open.set(true);
    }

    /// Close the menu. The returned command hands focus back to the button
    /// once the parent has reacted to the close.
    pub fn close_menu(&mut self) -> Command<Message> {
        if self.open.get() {
            log::debug!("menu closed");
        }
        self.open.set(false);
        self.search.clear();
        Command::message(Message::RestoreFocus)
    }

    /// Highlight `item`, or nothing, and move the navigation cursor there
    /// (the container when `None`). Returns the new cursor, or `None` when
    /// no container is attached.
    pub fn reset(&mut self, item: Option<NodeId>) -> Option<NodeId> {
        self.selected.set(item);
        let container = self.container.as_mut()?;
        let cursor = item.unwrap_or(container.node);
        container.walker.set_current(cursor);
        Some(cursor)
    }

    /// Highlight the `index`-th enabled item, 1-based. Negative indices
    /// count from the end (`-1` is the last item). Indices past either end
    /// stop at that end; `0` highlights nothing.
    pub fn goto_item(&mut self, index: i32) -> Option<NodeId> {
        self.reset(None);
        let item = {
            let container = self.container.as_mut()?;
            let walker = &mut container.walker;
            if index < 0 {
                if walker.last().is_some() {
                    for _ in 1..index.unsigned_abs() {
                        if walker.previous_node().is_none() {
                            break;
                        }
                    }
                }
            } else {
                for _ in 0..index {
                    if walker.next_node().is_none() {
                        break;
                    }
                }
            }
            let cursor = walker.current();
            (cursor != container.node).then_some(cursor)
        };
        log::trace!("goto item {index}: {item:?}");
        self.reset(item);
        item
    }

    /// Highlight the next enabled item, wrapping to the first.
    pub fn next_item(&mut self) -> Option<NodeId> {
        let next = self.container.as_mut()?.walker.next_node();
        match next {
            Some(item) => {
                self.selected.set(Some(item));
                Some(item)
            }
            None => self.goto_item(1),
        }
    }

    /// Highlight the previous enabled item, wrapping to the last.
    pub fn prev_item(&mut self) -> Option<NodeId> {
        let prev = self.container.as_mut()?.walker.previous_node();
        match prev {
            Some(item) => {
                self.selected.set(Some(item));
                Some(item)
            }
            None => self.goto_item(-1),
        }
    }

    /// Feed one character to type-ahead and highlight the first enabled
    /// item whose label starts with the buffer. The returned timer clears
    /// the buffer after the quiet period unless another character arrives.
    pub fn search(&mut self, ch: char) -> Command<Message> {
        let generation = self.search.push(ch);
        if let Some(container) = self.container_node() {
            match find_match(&self.document, container, self.search.query()) {
                Some(item) => {
                    self.reset(Some(item));
                }
                None => log::trace!("no item matches {:?}", self.search.query()),
            }
        }
        Command::tick(self.options.search_timeout, move |_| {
            Message::ClearSearch(generation)
        })
    }

    // -- event routing --------------------------------------------------

    fn within_button(&self, node: NodeId) -> bool {
        self.button_node()
            .is_some_and(|button| self.document.contains(button, node))
    }

    fn within_container(&self, node: NodeId) -> bool {
        self.container_node()
            .is_some_and(|container| self.document.contains(container, node))
    }

    /// The closest item at or above `node`, inside the container.
    fn enclosing_item(&self, node: NodeId) -> Option<NodeId> {
        let container = self.container_node()?;
        let mut cursor = node;
        while cursor != container {
            if is_item(&self.document, cursor) {
                return Some(cursor);
            }
            cursor = self.document.parent(cursor)?;
        }
        None
    }

    fn button_event(&mut self, event: &mut DomEvent) -> Command<Message> {
        match event.kind.clone() {
            EventKind::Click => {
                if self.is_open() {
                    self.close_menu()
                } else {
                    consume(event);
                    self.open_menu();
                    Command::none()
                }
            }
            EventKind::KeyDown(key) if !has_command_modifier(&key) => {
                let Some(action) = self.bindings.button_action(&key) else {
                    return Command::none();
                };
                consume(event);
                self.open_menu();
                let focus = match action {
                    ButtonAction::OpenFirst => Focus::First,
                    ButtonAction::OpenLast => Focus::Last,
                };
                Command::message(Message::Settled(focus))
            }
            // A Space release would otherwise click the button again right
            // after the press opened the menu.
            EventKind::KeyUp(key) if key.code == KeyCode::Char(' ') => {
                event.prevent_default();
                Command::none()
            }
            _ => Command::none(),
        }
    }

    fn container_event(&mut self, event: &mut DomEvent) -> Command<Message> {
        match event.kind.clone() {
            EventKind::KeyDown(key) => self.container_key(event, key),
            EventKind::Click => match self.enclosing_item(event.target) {
                Some(item) if !self.document.is_disabled(item) => {
                    event.prevent_default();
                    Command::batch([
                        Command::message(Message::Activated(item)),
                        self.close_menu(),
                    ])
                }
                _ => Command::none(),
            },
            EventKind::PointerEnter => {
                if let Some(item) = self.enclosing_item(event.target) {
                    if !self.document.is_disabled(item) {
                        self.reset(Some(item));
                    }
                }
                Command::none()
            }
            EventKind::PointerLeave => {
                if self.enclosing_item(event.target).is_some() {
                    self.reset(None);
                }
                Command::none()
            }
            _ => Command::none(),
        }
    }

    fn container_key(&mut self, event: &mut DomEvent, key: KeyEvent) -> Command<Message> {
        if has_command_modifier(&key) {
            return Command::none();
        }
        self.drop_stale_selection();
        let Some(action) = self.bindings.menu_action(&key) else {
            return match key.code {
                KeyCode::Char(ch) => self.search(ch),
                _ => Command::none(),
            };
        };
        consume(event);
        match action {
            MenuAction::Activate if key.code == KeyCode::Char(' ') && self.search.is_active() => {
                self.search(' ')
            }
            MenuAction::Activate => self.activate(),
            MenuAction::Next => {
                self.next_item();
                Command::none()
            }
            MenuAction::Prev => {
                self.prev_item();
                Command::none()
            }
            MenuAction::First => {
                self.goto_item(1);
                Command::none()
            }
            MenuAction::Last => {
                self.goto_item(-1);
                Command::none()
            }
            MenuAction::Close | MenuAction::Leave => self.close_menu(),
        }
    }

    /// Forget a highlighted item that was disabled or removed since it was
    /// selected. The walker cursor stays put so arrow keys continue from
    /// where the item was.
    fn drop_stale_selection(&mut self) {
        let (Some(item), Some(container)) = (self.selected.get(), self.container_node()) else {
            return;
        };
        if is_enabled_item(&self.document, item) && self.document.contains(container, item) {
            return;
        }
        log::debug!("menu item {item:?} left the enabled set");
        self.selected.set(None);
    }

    fn activate(&mut self) -> Command<Message> {
        self.drop_stale_selection();
        let chosen = self.selected.get();
        let close = self.close_menu();
        match chosen {
            Some(item) => {
                log::debug!("menu item {item:?} activated");
                Command::batch([Command::message(Message::Activated(item)), close])
            }
            None => close,
        }
    }

    // -- rendering ------------------------------------------------------

    fn button_label(&self) -> String {
        self.button_node()
            .map(|button| sanitize(self.document.text_content(button).trim()))
            .unwrap_or_default()
    }

    fn render_items(&self, frame: &mut Frame, area: Rect, container: NodeId) {
        let items = self.document.query_all(container, is_item);
        if items.is_empty() || area.height < 3 || area.width < 4 {
            return;
        }

        let height = (items.len() as u16 + 2).min(area.height);
        let list_area = Rect { height, ..area };
        frame.render_widget(Clear, list_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.style.border);
        let inner = block.inner(list_area);
        frame.render_widget(block, list_area);

        for (i, &item) in items.iter().take(inner.height as usize).enumerate() {
            let row = Rect {
                y: inner.y + i as u16,
                height: 1,
                ..inner
            };
            let is_selected = self.is_active(item);
            let style = if self.document.is_disabled(item) {
                self.style.disabled_item
            } else if is_selected {
                self.style.selected_item
            } else {
                self.style.item
            };
            let prefix = if is_selected { "▸ " } else { "  " };
            let label = sanitize(self.document.text_content(item).trim());
            let max_width = (row.width as usize).saturating_sub(display_width(prefix));
            let text = format!("{prefix}{}", truncate(&label, max_width, "…"));
            frame.render_widget(Paragraph::new(Span::styled(text, style)), row);
        }
    }
}

impl Component for Menu {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Open => {
                self.open_menu();
                Command::none()
            }
            Message::Close => self.close_menu(),
            Message::Settled(focus) => {
                if !self.is_open() {
                    return Command::none();
                }
                let Some(container) = self.container_node() else {
                    log::debug!("menu opened but no container was attached");
                    return Command::none();
                };
                self.document.focus(container);
                self.goto_item(focus.index());
                Command::none()
            }
            Message::RestoreFocus => {
                if let (false, Some(button)) = (self.is_open(), self.button_node()) {
                    self.document.focus(button);
                }
                Command::none()
            }
            Message::ClearSearch(generation) => {
                if self.search.expire(generation) {
                    log::trace!("type-ahead buffer cleared");
                }
                Command::none()
            }
            Message::Activated(_) => Command::none(),
        }
    }

    fn event(&mut self, event: &mut DomEvent) -> Command<Message> {
        let target = event.target;
        if self.within_button(target) {
            return self.button_event(event);
        }
        if self.within_container(target) {
            return self.container_event(event);
        }
        if event.kind == EventKind::PointerDown && self.is_open() && self.container.is_some() {
            log::debug!("pointer down outside menu at {target:?}");
            return self.close_menu();
        }
        Command::none()
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let open = self.is_open();
        let (style, marker) = if open {
            (self.style.button_open, " ▴")
        } else {
            (self.style.button, " ▾")
        };
        let label = truncate(
            &self.button_label(),
            (area.width as usize).saturating_sub(display_width(marker)),
            "…",
        );
        let button_row = Rect { height: 1, ..area };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(label, style),
                Span::styled(marker, style),
            ])),
            button_row,
        );

        if let (true, Some(container)) = (open, self.container_node()) {
            let list_area = Rect {
                y: area.y + 1,
                height: area.height - 1,
                ..area
            };
            self.render_items(frame, list_area, container);
        }
    }

    fn focused(&self) -> bool {
        self.is_open()
    }
}

fn consume(event: &mut DomEvent) {
    event.prevent_default();
    event.stop_propagation();
}

fn has_command_modifier(key: &KeyEvent) -> bool {
    key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
}
