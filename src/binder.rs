//! Cross-feature composition.
//!
//! A binding observes one feature's state or message stream and forwards
//! derived messages or effects into another feature, acting as an ordinary
//! external dispatcher. Binding is unidirectional and non-blocking: it runs
//! as an independent task and never affects either feature's own
//! message-loop serialization.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::warn;

use crate::core::{Dispatch, Message};
use crate::stream::{MessageStream, StateStream, Subscription};

/// Guard for a running binding task. Aborts the task on drop.
pub struct Binding {
    task: JoinHandle<()>,
}

impl Binding {
    /// Stop the binding.
    pub fn unbind(self) {
        self.task.abort();
    }

    /// Whether the binding task is still running.
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    pub(crate) fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            task: tokio::spawn(future),
        }
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Bind a feature's states to another feature through a projection.
///
/// For every observed state, `project` extracts a value; consecutive states
/// projecting to the same value are skipped (distinct-until-changed). Each
/// distinct value runs `run` with the target's dispatch handle. Invocations
/// are sequential within the binding; an `Err` from `run` is logged and the
/// binding moves on, mirroring effect-error semantics.
///
/// The binding ends when the source feature is dropped or the returned
/// [`Binding`] is dropped or unbound.
pub fn bind_states<S, V, M, P, R, Fut>(
    mut states: StateStream<S>,
    target: Dispatch<M>,
    project: P,
    run: R,
) -> Binding
where
    S: Send + 'static,
    V: PartialEq + Clone + Send + 'static,
    M: Message,
    P: Fn(&S) -> V + Send + 'static,
    R: Fn(V, Dispatch<M>) -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    Binding::spawn(async move {
        let mut last: Option<V> = None;
        while let Some(state) = states.next().await {
            let value = project(&state);
            if last.as_ref() == Some(&value) {
                continue;
            }
            last = Some(value.clone());
            if let Err(err) = run(value, target.clone()).await {
                warn!(error = %err, "binding effect failed");
            }
        }
    })
}

/// Bind a feature's accepted messages to another feature.
///
/// Each observed message is mapped to an optional message for the target;
/// only `Some` results are forwarded, awaiting admission for each. The
/// binding ends when either side goes away.
pub fn bind_messages<MA, MB, F>(
    mut messages: MessageStream<MA>,
    target: Dispatch<MB>,
    map: F,
) -> Binding
where
    MA: Message,
    MB: Message,
    F: Fn(MA) -> Option<MB> + Send + 'static,
{
    Binding::spawn(async move {
        while let Some(msg) = messages.next().await {
            if let Some(mapped) = map(msg) {
                if target.send(mapped).await.is_err() {
                    break;
                }
            }
        }
    })
}

/// Observe every value of a subscription with an async callback.
///
/// Rendering glue for hosts that only need "latest plus all future values":
/// subscribe, hand the subscription here, drop the [`Binding`] on view
/// teardown. Dropping it never affects the feature itself.
pub fn observe<T, F, Fut>(mut subscription: Subscription<T>, mut block: F) -> Binding
where
    T: Send + 'static,
    F: FnMut(T) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    Binding::spawn(async move {
        while let Some(value) = subscription.next().await {
            block(value).await;
        }
    })
}
