//! Unidirectional Model-Update-Effect runtime ("Feature").
//!
//! A [`Feature`] owns one piece of application state and evolves it through
//! discrete messages. Each accepted message is folded through a pure
//! [`Update`] into the next state, the new state is published on a
//! multicast replay-latest stream, and any effects produced by the
//! transition are launched concurrently with a dispatch handle back into
//! the same runtime.
//!
//! # Architecture
//!
//! ```text
//!            dispatch / sync_dispatch
//! caller ───────────────┐
//!                       ▼
//!                 message intake ──→ Update(msg, state) ──→ states stream
//!                       ▲                    │
//!                       │                 effects
//!                       │                    │
//!                       └──── Dispatch ◄── spawn (concurrent)
//! ```
//!
//! - **State**: immutable snapshot, replaced (never mutated) per transition
//! - **Message**: intent value driving a transition
//! - **Update**: pure `(message, state) -> (state, effects)` function
//! - **Effect**: asynchronous side-effecting task with dispatch-back
//! - **Binder**: cross-feature routing of states or messages
//!
//! The message loop is strictly sequential: one update call completes fully,
//! including publishing, before the next message is read. Effects are
//! deliberately unserialized so slow I/O in one effect never blocks message
//! processing or other effects.

pub mod binder;
pub mod config;
pub mod core;
pub mod error;
pub mod feature;
pub mod persistence;
pub mod scope;
pub mod stream;

pub use crate::core::{
    Dispatch, EffectHandler, Effects, Init, InitFn, Message, State, Update,
};
pub use binder::{bind_messages, bind_states, observe, Binding};
pub use config::{FeatureConfig, DEFAULT_MAILBOX_CAPACITY};
pub use error::DispatchError;
pub use feature::{Feature, FeatureHandle, FeatureParams};
pub use persistence::{persist, JsonFileStore, StateStore};
pub use scope::ScopeHandle;
pub use stream::{MessageStream, StateStream, Subscription};
