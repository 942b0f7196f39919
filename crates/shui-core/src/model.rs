use crate::command::Command;
use crate::dom::Document;
use crate::event::DomEvent;
use ratatui::Frame;

/// The top-level application trait.
///
/// The host owns a [`Document`] and drives a continuous cycle:
///
/// 1. [`init`](Model::init) builds the initial state around the document and
///    may return a [`Command`].
/// 2. Input arrives as [`DomEvent`]s targeted at the focused element (keys)
///    or at the element under the pointer, and is handed to
///    [`event`](Model::event). Unless the handler prevents it, the host then
///    runs the event's [`DefaultAction`](crate::event::DefaultAction).
/// 3. Commands are executed; queued messages reach [`update`](Model::update)
///    in arrival order.
/// 4. [`view`](Model::view) renders the current state.
///
/// # Example
///
/// ```rust,ignore
/// use shui_core::{Command, Document, DomEvent, Model};
/// use ratatui::Frame;
///
/// struct App { doc: Document, menu: Menu }
///
/// enum Msg { Menu(menu::Message) }
///
/// impl Model for App {
///     type Message = Msg;
///     type Flags = ();
///
///     fn init(_: (), doc: &Document) -> (Self, Command<Msg>) {
///         (App { doc: doc.clone(), menu: Menu::new(doc.clone()) }, Command::none())
///     }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Menu(m) => self.menu.update(m).map(Msg::Menu),
///         }
///     }
///
///     fn event(&mut self, event: &mut DomEvent) -> Command<Msg> {
///         self.menu.event(event).map(Msg::Menu)
///     }
///
///     fn view(&self, frame: &mut Frame) {
///         self.menu.view(frame, frame.area());
///     }
/// }
/// ```
pub trait Model: Sized + 'static {
    /// The application's message type.
    type Message: Send + 'static;

    /// Initialization data passed to [`Model::init`].
    type Flags: 'static;

    /// Create the initial model state and an optional startup command.
    ///
    /// `document` is the host's tree; keep a clone of the handle to build and
    /// inspect elements later.
    fn init(flags: Self::Flags, document: &Document) -> (Self, Command<Self::Message>);

    /// Process a message, mutate state, and return a command for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Handle an input event dispatched at an element.
    ///
    /// The default implementation ignores every event, leaving only the
    /// host's default actions.
    fn event(&mut self, event: &mut DomEvent) -> Command<Self::Message> {
        let _ = event;
        Command::none()
    }

    /// Render the current state to a ratatui [`Frame`].
    fn view(&self, frame: &mut Frame);
}
