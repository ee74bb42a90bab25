//! Update trait: the pure state-transition function.

use super::message::Message;
use super::state::State;

/// Effects produced by a single transition, launched concurrently by the
/// runtime in no particular order.
pub type Effects<E> = Vec<E>;

/// Update transforms state based on messages.
///
/// The update function is the only place where state transitions happen.
/// It must be a pure function: calling it twice with the same message and
/// state yields the same state and effects. Side effects live in
/// [`EffectHandler`](super::EffectHandler), never here.
///
/// Update is contractually total over its message/state domain: a panic
/// here is a programming error and terminates the runtime's message loop.
/// Representing messages and effects as enums matched exhaustively keeps
/// the compiler enforcing that contract.
pub trait Update: Send + 'static {
    /// The state type this update operates on.
    type State: State;

    /// The message type this update handles.
    type Msg: Message;

    /// The effect type produced by transitions.
    type Effect: Send + 'static;

    /// Process a message and return the new state plus effects to schedule.
    ///
    /// Must not block or suspend; runs inline on the message loop.
    fn update(&self, msg: Self::Msg, state: &Self::State) -> (Self::State, Effects<Self::Effect>);
}
