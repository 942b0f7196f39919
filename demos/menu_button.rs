//! # Menu Button Example
//!
//! A "File" menu button over the shui element tree:
//! - Binding a [`Menu`] to a button and mounting its list only while open
//! - Forwarding [`DomEvent`]s and lifting menu commands with `Command::map`
//! - Reacting to `menu::Message::Activated`
//!
//! Focus the button and press Enter, Space or the arrow keys to open the
//! menu. Inside it, use the arrows, Home/End, or type the start of a label.
//! `q` quits while the menu is closed.
//!
//! Run with: `cargo run --example menu_button`

use shui::crossterm::event::{KeyCode, KeyModifiers};
use shui::ratatui::layout::{Constraint, Layout};
use shui::ratatui::style::{Color, Style};
use shui::ratatui::text::{Line, Span};
use shui::ratatui::widgets::Paragraph;
use shui::ratatui::Frame;
use shui::widgets::menu::{self, Menu};
use shui::{Command, Component, Document, DomEvent, EventKind, Model, NodeId};

const ENTRIES: &[(&str, bool)] = &[
    ("New", false),
    ("Open…", false),
    ("Save", true),
    ("Save As…", false),
    ("Quit", false),
];

struct App {
    doc: Document,
    menu: Menu,
    list: NodeId,
    mounted: bool,
    status: String,
}

enum Msg {
    Menu(menu::Message),
}

impl App {
    // Mount the list while the menu is open, like a conditional block in a
    // template would.
    fn sync(&mut self) {
        let open = self.menu.is_open();
        if open && !self.mounted {
            if self.doc.append_child(self.doc.body(), self.list).is_ok() {
                self.menu.attach(self.list);
                self.mounted = true;
            }
        } else if !open && self.mounted {
            self.menu.detach();
            self.doc.remove(self.list);
            self.mounted = false;
        }
    }
}

impl Model for App {
    type Message = Msg;
    type Flags = ();

    fn init(_: (), doc: &Document) -> (Self, Command<Msg>) {
        let button = doc.create_element_with_text("button", "File");
        let _ = doc.append_child(doc.body(), button);

        let mut menu = Menu::new(doc.clone());
        menu.button(button);

        let list = doc.create_element("menu");
        for (label, disabled) in ENTRIES {
            let item = doc.create_element_with_text("li", *label);
            menu.item(item);
            doc.set_disabled(item, *disabled);
            let _ = doc.append_child(list, item);
        }
        doc.focus(button);

        let app = App {
            doc: doc.clone(),
            menu,
            list,
            mounted: false,
            status: "Nothing chosen yet".into(),
        };
        (app, Command::none())
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        let Msg::Menu(msg) = msg;
        if let menu::Message::Activated(item) = msg {
            let label = self.doc.text_content(item);
            if label == "Quit" {
                return Command::quit();
            }
            self.status = format!("Chose {label}");
        }
        let cmd = self.menu.update(msg).map(Msg::Menu);
        self.sync();
        cmd
    }

    fn event(&mut self, event: &mut DomEvent) -> Command<Msg> {
        let cmd = self.menu.event(event).map(Msg::Menu);
        self.sync();
        if let EventKind::KeyDown(key) = &event.kind {
            let ctrl_c =
                key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
            if ctrl_c || (key.code == KeyCode::Char('q') && !self.menu.is_open()) {
                return Command::quit();
            }
        }
        cmd
    }

    fn view(&self, frame: &mut Frame) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("shui", Style::default().fg(Color::Cyan)),
                Span::raw("  menu button demo"),
            ])),
            header,
        );

        let [menu_area, status_area] =
            Layout::horizontal([Constraint::Length(24), Constraint::Fill(1)]).areas(body);
        self.menu.view(frame, menu_area);
        frame.render_widget(Paragraph::new(self.status.as_str()), status_area);

        frame.render_widget(
            Paragraph::new(Span::styled(
                "enter/space/↑↓ open · type to search · esc close · q quit",
                Style::default().fg(Color::DarkGray),
            )),
            footer,
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), shui::ProgramError> {
    shui::run::<App>(()).await?;
    Ok(())
}
