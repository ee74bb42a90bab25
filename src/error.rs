//! Error types for message delivery.

use thiserror::Error;

/// Errors that can occur when delivering a message to a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The runtime was cancelled or its message loop terminated.
    ///
    /// Delivery after teardown fails explicitly rather than silently
    /// no-opping, so callers holding stale handles can tell.
    #[error("feature runtime is closed")]
    Closed,

    /// The intake is at capacity.
    ///
    /// Only returned by non-suspending delivery; the suspending form waits
    /// for capacity instead. See
    /// [`FeatureConfig::mailbox_capacity`](crate::FeatureConfig).
    #[error("feature mailbox is full")]
    MailboxFull,
}
