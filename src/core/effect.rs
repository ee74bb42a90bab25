//! Effect execution contract and the dispatch-back handle.

use std::future::Future;

use tokio::sync::mpsc;

use crate::error::DispatchError;

use super::message::Message;

/// Executes effects and feeds resulting messages back into the runtime.
///
/// Each effect runs as its own concurrent task inside the runtime's scope:
/// it may call dispatch zero, one, or many times, synchronously or after
/// arbitrary delay, and may spawn further work. Ordering is guaranteed only
/// between messages sent by the same sequential effect body; messages from
/// different effects interleave non-deterministically.
///
/// An `Err` return (or a panic) is local to that effect's task: the runtime
/// logs it and keeps processing messages. No automatic retry is provided;
/// an effect that the rest of the system must react to on failure has to
/// translate the failure into a message.
pub trait EffectHandler: Send + Sync + 'static {
    /// The effect type this handler executes.
    type Effect: Send + 'static;

    /// The message type dispatched back into the runtime.
    type Msg: Message;

    /// Execute one effect.
    fn handle(
        &self,
        effect: Self::Effect,
        dispatch: Dispatch<Self::Msg>,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Handle for delivering messages into a feature's intake.
///
/// Every scheduled effect receives a fresh `Dispatch` pointing at the same
/// runtime, valid across arbitrarily many transitions. Binders and other
/// external dispatchers use it the same way.
pub struct Dispatch<M> {
    tx: mpsc::Sender<M>,
}

impl<M: Message> Dispatch<M> {
    pub(crate) fn new(tx: mpsc::Sender<M>) -> Self {
        Self { tx }
    }

    /// Deliver `msg`, suspending until it is admitted to the intake.
    ///
    /// Resolves on queue admission, not on completion of the resulting
    /// transition. Messages sent sequentially through one handle are
    /// processed in that order.
    ///
    /// # Errors
    /// [`DispatchError::Closed`] if the runtime has been torn down.
    pub async fn send(&self, msg: M) -> Result<(), DispatchError> {
        self.tx.send(msg).await.map_err(|_| DispatchError::Closed)
    }

    /// Deliver `msg` without suspending.
    ///
    /// # Errors
    /// [`DispatchError::MailboxFull`] when the intake is at capacity,
    /// [`DispatchError::Closed`] after teardown.
    pub fn try_send(&self, msg: M) -> Result<(), DispatchError> {
        self.tx.try_send(msg).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => DispatchError::MailboxFull,
            mpsc::error::TrySendError::Closed(_) => DispatchError::Closed,
        })
    }
}

impl<M> Clone for Dispatch<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}
