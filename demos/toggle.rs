//! # Toggle Example
//!
//! Two toggle buttons sharing the focus order:
//! - Binding [`Toggle`]s to buttons with `aria-pressed`
//! - Applying (or vetoing) `toggle::Message::Change` in the parent
//!
//! Tab moves between the toggles and Space flips the focused one. The
//! "Airplane mode" toggle locks the Wi-Fi toggle while it is on.
//!
//! Run with: `cargo run --example toggle`

use shui::crossterm::event::{KeyCode, KeyModifiers};
use shui::ratatui::layout::{Constraint, Layout};
use shui::ratatui::style::{Color, Style};
use shui::ratatui::text::Span;
use shui::ratatui::widgets::Paragraph;
use shui::ratatui::Frame;
use shui::widgets::toggle::{self, Toggle};
use shui::{Command, Component, Document, DomEvent, EventKind, Model};

struct App {
    wifi: Toggle,
    airplane: Toggle,
}

enum Msg {
    Wifi(toggle::Message),
    Airplane(toggle::Message),
}

impl Model for App {
    type Message = Msg;
    type Flags = ();

    fn init(_: (), doc: &Document) -> (Self, Command<Msg>) {
        let wifi = doc.create_element_with_text("button", "Wi-Fi");
        let airplane = doc.create_element_with_text("button", "Airplane mode");
        let _ = doc.append_child(doc.body(), wifi);
        let _ = doc.append_child(doc.body(), airplane);
        doc.focus(wifi);

        let app = App {
            wifi: Toggle::attach(doc.clone(), wifi, true),
            airplane: Toggle::attach(doc.clone(), airplane, false),
        };
        (app, Command::none())
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Wifi(_) if self.airplane.pressed() => Command::none(),
            Msg::Wifi(m) => self.wifi.update(m).map(Msg::Wifi),
            Msg::Airplane(m) => {
                if let toggle::Message::Change(true) = m {
                    self.wifi.set_pressed(false);
                }
                self.airplane.update(m).map(Msg::Airplane)
            }
        }
    }

    fn event(&mut self, event: &mut DomEvent) -> Command<Msg> {
        if let EventKind::KeyDown(key) = &event.kind {
            let ctrl_c =
                key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
            if ctrl_c || key.code == KeyCode::Char('q') {
                return Command::quit();
            }
        }
        Command::batch([
            self.wifi.event(event).map(Msg::Wifi),
            self.airplane.event(event).map(Msg::Airplane),
        ])
    }

    fn view(&self, frame: &mut Frame) {
        let [wifi, airplane, _, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.wifi.view(frame, wifi);
        self.airplane.view(frame, airplane);
        frame.render_widget(
            Paragraph::new(Span::styled(
                "tab focus · space toggle · q quit",
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
