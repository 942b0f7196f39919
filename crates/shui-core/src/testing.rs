use crate::command::{Action, Command, CommandInner};
use crate::dom::{Document, NodeId};
use crate::event::{DomEvent, EventKind};
use crate::host;
use crate::model::Model;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// A headless test harness that drives a [`Model`] without a real terminal.
///
/// `TestProgram` owns a [`Document`] and exercises the whole
/// init/event/update/view cycle in a plain `#[test]` function -- no tokio
/// runtime or TTY required.
///
/// * Input helpers ([`press`](TestProgram::press), [`click`](TestProgram::click),
///   ...) dispatch events the way the terminal runtime does, run default
///   actions, and then settle: every queued [`Command::message`] is delivered
///   before the helper returns.
/// * [`Command::tick`] timers run on a virtual clock that only moves when
///   [`advance`](TestProgram::advance) is called.
///
/// # Example
///
/// ```rust,ignore
/// use shui_core::testing::TestProgram;
///
/// let mut prog = TestProgram::<App>::new(());
/// prog.document().focus(prog.model().button);
/// prog.press(KeyCode::Down);
/// assert!(prog.model().menu.is_open());
/// prog.advance(Duration::from_millis(350));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    document: Document,
    pending_messages: VecDeque<M::Message>,
    timers: Vec<PendingTick<M::Message>>,
    elapsed: Duration,
    next_seq: u64,
    quit: bool,
}

struct PendingTick<Msg> {
    due: Duration,
    seq: u64,
    map: Box<dyn FnOnce(Instant) -> Msg + Send>,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags
    /// and a fresh document.
    ///
    /// Synchronous commands produced by `init` are queued, not delivered;
    /// call [`drain_messages`](TestProgram::drain_messages) to process them.
    pub fn new(flags: M::Flags) -> Self {
        let document = Document::new();
        let (model, init_cmd) = M::init(flags, &document);
        let mut program = Self {
            model,
            document,
            pending_messages: VecDeque::new(),
            timers: Vec::new(),
            elapsed: Duration::ZERO,
            next_seq: 0,
            quit: false,
        };
        program.collect(init_cmd);
        program
    }

    /// Send a message, triggering a single update cycle.
    ///
    /// Commands returned by `update` are collected; call
    /// [`drain_messages`](TestProgram::drain_messages) to flush them.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect(cmd);
    }

    /// Process pending messages until no new ones are generated.
    pub fn drain_messages(&mut self) {
        while let Some(msg) = self.pending_messages.pop_front() {
            let cmd = self.model.update(msg);
            self.collect(cmd);
        }
    }

    /// Dispatch an event, run its default action and settle.
    ///
    /// Returns the event as the model left it, so tests can check
    /// [`default_prevented`](DomEvent::default_prevented) and
    /// [`propagation_stopped`](DomEvent::propagation_stopped).
    pub fn dispatch(&mut self, event: DomEvent) -> DomEvent {
        let mut commands = Vec::new();
        let event = host::dispatch(&mut self.model, &self.document, event, &mut commands);
        for cmd in commands {
            self.collect(cmd);
        }
        self.drain_messages();
        event
    }

    /// Key-down at the focused element. Returns the handled event.
    pub fn key_down(&mut self, key: KeyEvent) -> DomEvent {
        let target = self.document.active_element();
        self.dispatch(DomEvent::key_down(target, key))
    }

    /// Key-up at the focused element. Returns the handled event.
    pub fn key_up(&mut self, key: KeyEvent) -> DomEvent {
        let target = self.document.active_element();
        self.dispatch(DomEvent::key_up(target, key))
    }

    /// Press and release a key without modifiers. Returns the key-down event.
    pub fn press(&mut self, code: KeyCode) -> DomEvent {
        let key = key(code);
        let down = self.key_down(key);
        self.key_up(key);
        down
    }

    /// Press and release each character of `text` in turn.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press(KeyCode::Char(ch));
        }
    }

    /// Pointer-down followed by a click on `target`. Returns the click event.
    pub fn click(&mut self, target: NodeId) -> DomEvent {
        self.dispatch(DomEvent::pointer_down(target));
        self.dispatch(DomEvent::click(target))
    }

    /// Move the pointer onto `target`.
    pub fn hover(&mut self, target: NodeId) -> DomEvent {
        self.dispatch(DomEvent::new(EventKind::PointerEnter, target))
    }

    /// Move the pointer off `target`.
    pub fn unhover(&mut self, target: NodeId) -> DomEvent {
        self.dispatch(DomEvent::new(EventKind::PointerLeave, target))
    }

    /// Move the virtual clock forward, firing due timers in deadline order.
    pub fn advance(&mut self, by: Duration) {
        let until = self.elapsed + by;
        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due <= until)
                .min_by_key(|(_, t)| (t.due, t.seq))
                .map(|(i, _)| i);
            let Some(index) = next else { break };
            let timer = self.timers.remove(index);
            self.elapsed = timer.due;
            let msg = (timer.map)(Instant::now());
            let cmd = self.model.update(msg);
            self.collect(cmd);
            self.drain_messages();
        }
        self.elapsed = until;
    }

    /// Time on the virtual clock.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether a [`Command::quit`] was returned.
    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// The host document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model for direct test setup.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render the model to a ratatui [`Buffer`] of the given dimensions.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("test backend never fails");
        terminal
            .draw(|frame| {
                self.model.view(frame);
            })
            .expect("test backend never fails");
        terminal.backend().buffer().clone()
    }

    /// Render the model and return the visible content as a plain string,
    /// one line per row.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        let buf = self.render(width, height);
        let area = Rect::new(0, 0, width, height);
        let mut output = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                output.push_str(buf[(x, y)].symbol());
            }
            if y < area.bottom() - 1 {
                output.push('\n');
            }
        }
        output
    }

    fn collect(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                self.pending_messages.push_back(msg);
            }
            CommandInner::Action(Action::Quit) => self.quit = true,
            CommandInner::Tick { after, map } => {
                self.timers.push(PendingTick {
                    due: self.elapsed + after,
                    seq: self.next_seq,
                    map,
                });
                self.next_seq += 1;
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
        }
    }
}

/// A key press without modifiers.
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

/// A key press with the given modifiers.
pub fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        modifiers,
        ..key(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    // Counts clicks on a single button and echoes timers.
    struct Clicker {
        button: NodeId,
        swallow_enter: bool,
        clicks: u32,
        steps: Vec<String>,
    }

    #[derive(Debug)]
    enum Msg {
        Clicked,
        Step(&'static str),
        Delayed(&'static str),
    }

    impl Model for Clicker {
        type Message = Msg;
        type Flags = bool;

        fn init(swallow_enter: bool, doc: &Document) -> (Self, Command<Msg>) {
            let button = doc.create_element_with_text("button", "Go");
            doc.append_child(doc.body(), button).unwrap();
            doc.focus(button);
            let model = Clicker {
                button,
                swallow_enter,
                clicks: 0,
                steps: vec![],
            };
            (model, Command::message(Msg::Step("init")))
        }

        fn update(&mut self, msg: Msg) -> Command<Msg> {
            match msg {
                Msg::Clicked => {
                    self.clicks += 1;
                    Command::message(Msg::Step("after-click"))
                }
                Msg::Step(s) | Msg::Delayed(s) => {
                    self.steps.push(s.to_string());
                    Command::none()
                }
            }
        }

        fn event(&mut self, event: &mut DomEvent) -> Command<Msg> {
            match event.kind.clone() {
                EventKind::Click if event.target == self.button => Command::message(Msg::Clicked),
                EventKind::KeyDown(k) if k.code == KeyCode::Enter && self.swallow_enter => {
                    event.prevent_default();
                    Command::none()
                }
                EventKind::KeyDown(k) if k.code == KeyCode::Char('t') => Command::batch([
                    Command::tick(Duration::from_millis(200), |_| Msg::Delayed("late")),
                    Command::tick(Duration::from_millis(100), |_| Msg::Delayed("early")),
                ]),
                _ => Command::none(),
            }
        }

        fn view(&self, frame: &mut ratatui::Frame) {
            let text = format!("Clicks: {}", self.clicks);
            frame.render_widget(Paragraph::new(text), frame.area());
        }
    }

    #[test]
    fn init_commands_wait_for_drain() {
        let mut prog = TestProgram::<Clicker>::new(false);
        assert!(prog.model().steps.is_empty());
        prog.drain_messages();
        assert_eq!(prog.model().steps, vec!["init"]);
    }

    #[test]
    fn enter_on_button_synthesizes_click_and_settles() {
        let mut prog = TestProgram::<Clicker>::new(false);
        prog.drain_messages();
        let ev = prog.press(KeyCode::Enter);
        assert!(!ev.default_prevented());
        assert_eq!(prog.model().clicks, 1);
        assert_eq!(prog.model().steps, vec!["init", "after-click"]);
    }

    #[test]
    fn prevented_enter_does_not_click() {
        let mut prog = TestProgram::<Clicker>::new(true);
        let ev = prog.press(KeyCode::Enter);
        assert!(ev.default_prevented());
        assert_eq!(prog.model().clicks, 0);
    }

    #[test]
    fn click_helper_dispatches_pointer_then_click() {
        let mut prog = TestProgram::<Clicker>::new(false);
        let button = prog.model().button;
        prog.document().blur();
        prog.click(button);
        assert_eq!(prog.model().clicks, 1);
        assert!(prog.document().has_focus(button));
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let mut prog = TestProgram::<Clicker>::new(false);
        prog.drain_messages();
        prog.press(KeyCode::Char('t'));
        assert_eq!(prog.pending_timers(), 2);

        prog.advance(Duration::from_millis(99));
        assert_eq!(prog.model().steps, vec!["init"]);

        prog.advance(Duration::from_millis(200));
        assert_eq!(prog.model().steps, vec!["init", "early", "late"]);
        assert_eq!(prog.pending_timers(), 0);
        assert_eq!(prog.elapsed(), Duration::from_millis(299));
    }

    #[test]
    fn render_after_update() {
        let mut prog = TestProgram::<Clicker>::new(false);
        prog.press(KeyCode::Enter);
        prog.press(KeyCode::Enter);
        let content = prog.render_string(20, 1);
        assert!(content.contains("Clicks: 2"));
    }
}
