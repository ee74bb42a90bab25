//! Model-Update-Effect type contracts.
//!
//! This module provides the base traits for implementing unidirectional
//! data flow.
//!
//! # Architecture
//!
//! ```text
//! Message ──→ Update ──→ State ──→ observers
//!    ↑                     │
//!    └───── Effect ◄───────┘
//! ```
//!
//! - **State**: Immutable representation of feature state
//! - **Message**: External intents or effect results
//! - **Update**: Pure function that transforms state based on messages
//! - **Init**: Produces the first state, optionally from a persisted one
//! - **EffectHandler**: Executes effects and dispatches resulting messages

mod effect;
mod init;
mod message;
mod state;
mod update;

pub use effect::{Dispatch, EffectHandler};
pub use init::{Init, InitFn};
pub use message::Message;
pub use state::State;
pub use update::{Effects, Update};
