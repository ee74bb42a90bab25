//! Cancellation boundary of a feature runtime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tokio::task::AbortHandle;

/// Handle to a feature's lifetime.
///
/// Cancelling stops message processing and aborts every in-flight effect
/// task transitively; no new effects can be scheduled afterward. The handle
/// is the whole lifecycle surface the host needs: "cancel now" plus a way
/// to await "closed".
#[derive(Clone)]
pub struct ScopeHandle {
    cancelled: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
    notify: Arc<Notify>,
    abort: AbortHandle,
}

impl ScopeHandle {
    pub(crate) fn new(abort: AbortHandle) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            closed: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
            abort,
        }
    }

    /// Request teardown. Idempotent.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.abort.abort();
        }
    }

    /// Whether teardown has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Whether the message loop has terminated.
    ///
    /// True after cancellation completes, but also when the loop ends on
    /// its own (dependency-resolution failure or an update panic).
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Wait until the message loop has terminated.
    pub async fn closed(&self) {
        // Subscribe to Notify BEFORE checking the flag to avoid a TOCTOU
        // race with mark_closed.
        loop {
            let notified = self.notify.notified();
            if self.is_closed() {
                return;
            }
            notified.await;
        }
    }

    pub(crate) fn mark_closed(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }
}
