use std::sync::Arc;
use std::time::{Duration, Instant};

/// A side effect returned from [`Model::update`](crate::Model::update),
/// [`Model::event`](crate::Model::event) or [`Model::init`](crate::Model::init).
///
/// Commands are how a behaviour defers work past the current update:
///
/// * [`Command::message`] delivers a message once the current update, and
///   everything the parent does in response to it, has completed. Use it for
///   continuations that must observe the committed tree, such as moving focus
///   into a container that the parent mounts when a menu opens.
/// * [`Command::tick`] delivers a message after a delay. Superseding a tick is
///   done by tagging the message (for example with a generation counter) and
///   ignoring stale ones.
///
/// # Examples
///
/// ```rust,ignore
/// // Do nothing:
/// let cmd = Command::none();
///
/// // Continue after the parent has reacted to this update:
/// let cmd = Command::message(Msg::Settled);
///
/// // Fire once after 350ms:
/// let cmd = Command::tick(Duration::from_millis(350), |_| Msg::Expired(generation));
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) inner: CommandInner<Msg>,
}

pub(crate) enum CommandInner<Msg: Send + 'static> {
    None,
    Action(Action<Msg>),
    Tick {
        after: Duration,
        map: Box<dyn FnOnce(Instant) -> Msg + Send>,
    },
    Batch(Vec<Command<Msg>>),
}

/// Actions the host processes synchronously, without spawning tasks.
pub enum Action<Msg> {
    /// Queue a message behind the current update.
    Message(Msg),
    /// Stop the program.
    Quit,
}

impl<Msg: Send + 'static> Command<Msg> {
    /// No-op command.
    pub fn none() -> Self {
        Command {
            inner: CommandInner::None,
        }
    }

    /// Queue a message to be handled after the current update settles.
    pub fn message(msg: Msg) -> Self {
        Command {
            inner: CommandInner::Action(Action::Message(msg)),
        }
    }

    /// Quit the program.
    pub fn quit() -> Self {
        Command {
            inner: CommandInner::Action(Action::Quit),
        }
    }

    /// One-shot timer: fires once after `after`, mapping the instant to a message.
    pub fn tick(after: Duration, map: impl FnOnce(Instant) -> Msg + Send + 'static) -> Self {
        Command {
            inner: CommandInner::Tick {
                after,
                map: Box::new(map),
            },
        }
    }

    /// Run multiple commands. No-op commands are dropped.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|cmd| !cmd.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.pop().unwrap_or_else(Command::none),
            _ => Command {
                inner: CommandInner::Batch(cmds),
            },
        }
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Command<NewMsg> {
        self.map_with(Arc::new(f))
    }

    fn map_with<NewMsg: Send + 'static>(
        self,
        f: Arc<dyn Fn(Msg) -> NewMsg + Send + Sync>,
    ) -> Command<NewMsg> {
        match self.inner {
            CommandInner::None => Command::none(),
            CommandInner::Action(Action::Message(msg)) => Command::message(f(msg)),
            CommandInner::Action(Action::Quit) => Command::quit(),
            CommandInner::Tick { after, map } => Command::tick(after, move |at| f(map(at))),
            CommandInner::Batch(cmds) => Command {
                inner: CommandInner::Batch(
                    cmds.into_iter()
                        .map(|cmd| cmd.map_with(Arc::clone(&f)))
                        .collect(),
                ),
            },
        }
    }

    // --- Inspection methods (useful for testing) ---

    /// Returns `true` if this is a no-op command.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// If this command is an immediate message action, return it.
    pub fn into_message(self) -> Option<Msg> {
        match self.inner {
            CommandInner::Action(Action::Message(msg)) => Some(msg),
            _ => None,
        }
    }

    /// If this command is a batch, return the inner commands.
    pub fn into_batch(self) -> Option<Vec<Command<Msg>>> {
        match self.inner {
            CommandInner::Batch(cmds) => Some(cmds),
            _ => None,
        }
    }

    /// The delay of a timer command.
    pub fn tick_delay(&self) -> Option<Duration> {
        match &self.inner {
            CommandInner::Tick { after, .. } => Some(*after),
            _ => None,
        }
    }
}
