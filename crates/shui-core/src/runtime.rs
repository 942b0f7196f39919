use crate::command::{Action, Command, CommandInner};
use crate::dom::Document;
use crate::event::DomEvent;
use crate::host;
use crate::model::Model;
use crossterm::{
    cursor, execute,
    event::{Event, EventStream, KeyEvent, KeyEventKind},
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout, Stdout};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Errors that can occur while initializing or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// An I/O error from terminal setup, rendering, or teardown.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration options for a [`Program`].
///
/// Use struct update syntax to override only the options you need:
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     fps: 30,
///     title: Some("Menu demo".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Target frames per second (default: 60, max: 120).
    pub fps: u32,
    /// Start in alternate screen (default: true).
    pub alt_screen: bool,
    /// Set terminal title.
    pub title: Option<String>,
    /// Whether to catch panics and restore terminal (default: true).
    pub catch_panics: bool,
    /// Whether Ctrl+C quits the program (default: true).
    pub handle_signals: bool,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            title: None,
            catch_panics: true,
            handle_signals: true,
        }
    }
}

/// The terminal host. Owns the [`Document`], routes terminal input to it
/// and drives the [`Model`] lifecycle.
///
/// Key presses are dispatched at [`Document::active_element`] as a key-down
/// immediately followed by a key-up, since terminals rarely report releases.
///
/// # Example
///
/// ```rust,ignore
/// use shui_core::{Program, ProgramError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let model = Program::<MyApp>::new(())?.run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    document: Document,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    options: ProgramOptions,
    needs_redraw: bool,
    should_quit: bool,
}

impl<M: Model> Program<M> {
    /// Create a new program with default options.
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Create a new program with custom options.
    ///
    /// Returns an error if terminal initialization fails.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let document = Document::new();
        let (model, init_cmd) = M::init(flags, &document);
        let terminal = init_terminal(&options)?;

        let mut program = Self {
            model,
            document,
            terminal,
            msg_tx,
            msg_rx,
            options,
            needs_redraw: true,
            should_quit: false,
        };
        log::debug!("program initialized");
        program.execute_command(init_cmd);
        Ok(program)
    }

    /// Get a sender for external message injection.
    pub fn sender(&self) -> mpsc::UnboundedSender<M::Message> {
        self.msg_tx.clone()
    }

    /// The host document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Run the program until the model quits. Returns the final model.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let result = self.event_loop().await;
        log::debug!("shutting down");
        restore_terminal(&self.options)?;
        result.map(|()| self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.render()?;

        let fps = self.options.fps.clamp(1, 120);
        let mut frame_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut events = EventStream::new();
        let handle_signals = self.options.handle_signals;

        loop {
            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    log::debug!("received ctrl+c signal");
                    return Ok(());
                }

                Some(msg) = self.msg_rx.recv() => {
                    self.process_message(msg);

                    // Micro-batch: drain queued messages within 100µs, up to 100 messages
                    let deadline = Instant::now() + Duration::from_micros(100);
                    let mut batch_count = 0u32;
                    while Instant::now() < deadline && batch_count < 100 {
                        match self.msg_rx.try_recv() {
                            Ok(msg) => {
                                self.process_message(msg);
                                batch_count += 1;
                            }
                            Err(_) => break,
                        }
                    }
                }

                Some(event) = events.next() => {
                    self.process_terminal_event(event?);
                }

                _ = frame_interval.tick() => {
                    if self.needs_redraw {
                        self.render()?;
                        self.needs_redraw = false;
                    }
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn process_message(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute_command(cmd);
        self.needs_redraw = true;
    }

    fn process_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.process_key(key),
            Event::Resize(..) => self.needs_redraw = true,
            _ => {}
        }
    }

    fn process_key(&mut self, key: KeyEvent) {
        let target = self.document.active_element();
        let mut commands = Vec::new();
        host::dispatch(
            &mut self.model,
            &self.document,
            DomEvent::key_down(target, key),
            &mut commands,
        );
        // Releases go to whatever holds focus after the press was handled.
        let target = self.document.active_element();
        host::dispatch(
            &mut self.model,
            &self.document,
            DomEvent::key_up(target, KeyEvent { kind: KeyEventKind::Release, ..key }),
            &mut commands,
        );
        for cmd in commands {
            self.execute_command(cmd);
        }
        self.needs_redraw = true;
    }

    fn execute_command(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Action(Action::Quit) => {
                self.should_quit = true;
            }
            CommandInner::Tick { after, map } => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(map(Instant::now()));
                });
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd);
                }
            }
        }
    }

    fn render(&mut self) -> Result<(), ProgramError> {
        self.terminal.draw(|frame| {
            self.model.view(frame);
        })?;
        Ok(())
    }
}

fn init_terminal(options: &ProgramOptions) -> Result<Terminal<CrosstermBackend<Stdout>>, ProgramError> {
    // Install panic hook that restores terminal (only once to avoid stacking)
    if options.catch_panics {
        use std::sync::Once;
        static HOOK_INSTALLED: Once = Once::new();
        let alt_screen = options.alt_screen;
        HOOK_INSTALLED.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore_terminal_minimal(alt_screen);
                original_hook(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = stdout();
    if options.alt_screen {
        execute!(writer, EnterAlternateScreen)?;
    }
    if let Some(ref title) = options.title {
        execute!(writer, SetTitle(title))?;
    }
    execute!(writer, cursor::Hide)?;

    let terminal = Terminal::new(CrosstermBackend::new(writer))?;
    Ok(terminal)
}

fn restore_terminal(options: &ProgramOptions) -> Result<(), ProgramError> {
    restore_terminal_minimal(options.alt_screen)?;
    Ok(())
}

fn restore_terminal_minimal(alt_screen: bool) -> Result<(), io::Error> {
    // Best-effort: keep restoring even if a step fails.
    let raw = disable_raw_mode();
    let mut writer = stdout();
    execute!(writer, cursor::Show).ok();
    if alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    raw
}
