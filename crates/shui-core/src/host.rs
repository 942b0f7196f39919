//! Event dispatch shared by [`Program`](crate::Program) and
//! [`TestProgram`](crate::testing::TestProgram).

use crate::command::Command;
use crate::dom::Document;
use crate::event::{default_action, DefaultAction, DomEvent};
use crate::model::Model;

/// Dispatch `event` to the model, then run its default action unless the
/// model prevented it. Commands produced along the way are appended to
/// `commands` in dispatch order. Returns the event as the model left it.
pub(crate) fn dispatch<M: Model>(
    model: &mut M,
    document: &Document,
    mut event: DomEvent,
    commands: &mut Vec<Command<M::Message>>,
) -> DomEvent {
    log::trace!("dispatch {:?} at {:?}", event.kind, event.target);
    commands.push(model.event(&mut event));
    match default_action(document, &event) {
        Some(DefaultAction::MoveFocus(node)) => {
            document.focus(node);
        }
        Some(DefaultAction::Dispatch(follow_up)) => {
            dispatch(model, document, follow_up, commands);
        }
        None => {}
    }
    event
}
