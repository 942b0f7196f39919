use crate::command::Command;
use crate::event::DomEvent;
use ratatui::{layout::Rect, Frame};

/// A behaviour attached to elements of a [`Document`](crate::Document) that
/// renders into a given [`Rect`].
///
/// `Component` mirrors [`Model`](crate::Model) without `init`: components are
/// constructed by their parent, which forwards events and messages and lifts
/// the returned commands with [`Command::map`].
///
/// Events are offered to every component the parent owns. A component
/// decides from [`DomEvent::target`] whether the event concerns one of the
/// elements it is bound to, and returns [`Command::none`] otherwise.
pub trait Component: 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Handle an input event. The default implementation ignores it.
    fn event(&mut self, event: &mut DomEvent) -> Command<Self::Message> {
        let _ = event;
        Command::none()
    }

    /// Render into a specific `area` of the [`Frame`].
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Whether this component currently owns keyboard input.
    ///
    /// The default implementation returns `false`.
    fn focused(&self) -> bool {
        false
    }
}
