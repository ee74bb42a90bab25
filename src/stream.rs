//! Multicast stream primitive backing the state and message streams.
//!
//! A [`Multicast`] fans values out to any number of subscribers. Each
//! subscriber gets its own unbounded buffer, so a slow observer never
//! causes another observer (or the publisher) to skip or block; the cost
//! is unbounded growth behind an observer that stops reading.
//!
//! In replay-latest mode a new subscriber immediately receives the most
//! recently published value before any subsequent ones. The stream never
//! completes on its own: a subscription only ends once every `Multicast`
//! handle has been dropped and the buffer is drained.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Replay behavior handed to new subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Replay {
    /// Seed each new subscriber with the latest published value.
    Latest,
    /// New subscribers only see values published after they subscribe.
    None,
}

struct Inner<T> {
    latest: Option<T>,
    subscribers: Vec<mpsc::UnboundedSender<T>>,
}

/// Fan-out publisher with optional replay of the latest value.
pub(crate) struct Multicast<T> {
    inner: Arc<Mutex<Inner<T>>>,
    replay: Replay,
}

impl<T: Clone + Send + 'static> Multicast<T> {
    pub(crate) fn new(replay: Replay) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                latest: None,
                subscribers: Vec::new(),
            })),
            replay,
        }
    }

    /// Publish `value` to every live subscriber, pruning closed ones.
    pub(crate) fn publish(&self, value: T) {
        let mut inner = self.inner.lock();
        inner
            .subscribers
            .retain(|tx| tx.send(value.clone()).is_ok());
        if self.replay == Replay::Latest {
            inner.latest = Some(value);
        }
    }

    /// Whether anyone is currently subscribed.
    ///
    /// Lets the runtime skip cloning values into a tap nobody reads.
    pub(crate) fn has_subscribers(&self) -> bool {
        !self.inner.lock().subscribers.is_empty()
    }

    pub(crate) fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        if let Some(latest) = &inner.latest {
            // Cannot fail: rx is still in scope.
            let _ = tx.send(latest.clone());
        }
        inner.subscribers.push(tx);
        Subscription { rx }
    }
}

impl<T> Clone for Multicast<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            replay: self.replay,
        }
    }
}

/// Receiving side of a [`Multicast`].
///
/// Values arrive in publication order with none skipped. Also usable as a
/// [`futures_core::Stream`].
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Receive the next value.
    ///
    /// Returns `None` only once the publishing side is gone (the owning
    /// feature was dropped) and all buffered values have been drained.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Receive without waiting; `None` when no value is buffered.
    pub fn try_next(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

impl<T> futures_core::Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.rx.poll_recv(cx)
    }
}

/// Multicast replay-latest stream of a feature's states.
pub type StateStream<S> = Subscription<S>;

/// Stream of the messages accepted by a feature's loop.
pub type MessageStream<M> = Subscription<M>;
