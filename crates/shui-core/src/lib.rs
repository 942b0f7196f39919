//! Core host for the **shui** behaviours.
//!
//! `shui-core` provides a headless element tree, DOM-style event dispatch
//! and the runtime that drives applications built on it. The design follows
//! the [Elm Architecture]: a program is an **init -> event/update -> view**
//! cycle, with side effects pushed to the edges through [`Command`]s.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Document`] | Arena element tree with attributes, text and a single focused element |
//! | [`DomEvent`] | An input event targeted at a [`NodeId`], with default-action flags |
//! | [`Writable`] | Observable value with synchronous, explicitly released subscriptions |
//! | [`Teardown`] | Bundle of release steps run together |
//! | [`Model`] | Top-level application trait (init / update / event / view) |
//! | [`Component`] | Reusable behaviour that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | Describes a side effect to be executed by the runtime |
//! | [`Program`] | Wires a [`Model`] to a real terminal and drives the event loop |
//! | [`TestProgram`](testing::TestProgram) | Headless harness with a virtual clock |
//!
//! # Event flow
//!
//! 1. Terminal input becomes a [`DomEvent`] targeted at
//!    [`Document::active_element`].
//! 2. [`Model::event`] handles it and may call
//!    [`DomEvent::prevent_default`].
//! 3. Unless prevented, the host runs the [`DefaultAction`]: Tab moves
//!    focus, Enter and Space activate buttons.
//! 4. Returned commands run; [`Command::message`] continuations are
//!    delivered after the current update has completed, and
//!    [`Command::tick`] fires after its delay.
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod dom;
pub mod event;
mod host;
pub mod model;
pub mod runtime;
pub mod store;
pub mod teardown;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use dom::{Document, DomError, NodeId};
pub use event::{default_action, DefaultAction, DomEvent, EventKind};
pub use model::Model;
pub use runtime::{Program, ProgramError, ProgramOptions};
pub use store::{Unsubscriber, Writable};
pub use teardown::Teardown;

/// Run a shui application with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
