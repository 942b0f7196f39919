//! **shui** -- accessible, keyboard-navigable menu and toggle behaviours over
//! a headless element tree, rendered with [`ratatui`].
//!
//! This is the umbrella crate that re-exports everything needed to build a
//! shui application from a single dependency:
//!
//! ```toml
//! [dependencies]
//! shui = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`shui_core`] are available at the crate root
//!   ([`Document`], [`DomEvent`], [`Writable`], [`Model`], [`Component`],
//!   [`Command`], [`Program`], [`run`], [`run_with`], etc.).
//! * The [`widgets`] module re-exports everything from [`shui_widgets`]
//!   (menu button, toggle, walker, key bindings).
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use shui::widgets::menu::{self, Menu};
//! use shui::{Command, Component, Document, DomEvent, Model, NodeId};
//! use ratatui::Frame;
//!
//! struct App { menu: Menu }
//! enum Msg { Menu(menu::Message) }
//!
//! impl Model for App {
//!     type Message = Msg;
//!     type Flags = ();
//!
//!     fn init(_: (), doc: &Document) -> (Self, Command<Msg>) {
//!         let button = doc.create_element_with_text("button", "File");
//!         doc.append_child(doc.body(), button).unwrap();
//!         let mut menu = Menu::new(doc.clone());
//!         menu.button(button);
//!         (App { menu }, Command::none())
//!     }
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::Menu(m) => self.menu.update(m).map(Msg::Menu),
//!         }
//!     }
//!     fn event(&mut self, event: &mut DomEvent) -> Command<Msg> {
//!         self.menu.event(event).map(Msg::Menu)
//!     }
//!     fn view(&self, frame: &mut Frame) {
//!         self.menu.view(frame, frame.area());
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     shui::run::<App>(()).await.unwrap();
//! }
//! ```

pub use shui_core::*;
pub mod widgets {
    pub use shui_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
