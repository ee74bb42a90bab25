//! Base trait for messages (intents) driving state transitions.

/// Marker trait for message objects.
///
/// Messages represent:
/// - External intents (user actions, host events)
/// - Effect results (a load finished, a request failed)
///
/// Messages are processed one at a time by the update function. `Clone` is
/// required so the runtime can mirror accepted messages onto the message
/// tap consumed by [`bind_messages`](crate::bind_messages).
pub trait Message: Clone + Send + 'static {}
