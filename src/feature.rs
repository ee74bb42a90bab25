//! The Feature runtime: a message-driven state machine.
//!
//! A [`Feature`] owns the current state, the message intake, and the effect
//! scheduler. Messages are folded through the update function strictly one
//! at a time; effects run concurrently inside the runtime's scope and feed
//! messages back through a [`Dispatch`] handle.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::FeatureConfig;
use crate::core::{Dispatch, EffectHandler, Init, Message, State, Update};
use crate::error::DispatchError;
use crate::scope::ScopeHandle;
use crate::stream::{MessageStream, Multicast, Replay, StateStream};

/// Required parameters for creating a [`Feature`].
///
/// The triple of [`Init`], [`Update`] and [`EffectHandler`] fully describes
/// a feature; the runtime supplies everything else.
pub struct FeatureParams<I, U, H> {
    pub init: I,
    pub update: U,
    pub effect_handler: H,
}

/// A running feature instance.
///
/// Created with [`Feature::spawn`]; torn down with [`Feature::cancel`] or
/// on drop, which aborts the message loop and every in-flight effect.
pub struct Feature<S: State, M: Message> {
    dispatch: Dispatch<M>,
    states: Multicast<S>,
    messages: Multicast<M>,
    scope: ScopeHandle,
    id: Uuid,
}

impl<S: State, M: Message> Feature<S, M> {
    /// Spawn a feature with the default [`FeatureConfig`].
    ///
    /// `previous` is a previously persisted state, if the hosting surface
    /// was re-created; `None` on first launch.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn<U, I, H>(previous: Option<S>, params: FeatureParams<I, U, H>) -> Self
    where
        U: Update<State = S, Msg = M>,
        I: Init<State = S, Effect = U::Effect>,
        H: EffectHandler<Effect = U::Effect, Msg = M>,
    {
        Self::spawn_with(previous, params, FeatureConfig::default())
    }

    /// Spawn a feature with an explicit [`FeatureConfig`].
    pub fn spawn_with<U, I, H>(
        previous: Option<S>,
        params: FeatureParams<I, U, H>,
        config: FeatureConfig,
    ) -> Self
    where
        U: Update<State = S, Msg = M>,
        I: Init<State = S, Effect = U::Effect>,
        H: EffectHandler<Effect = U::Effect, Msg = M>,
    {
        let (tx, rx) = mpsc::channel(config.mailbox_capacity.max(1));
        let intake = tx.downgrade();
        let dispatch = Dispatch::new(tx);
        let states = Multicast::new(Replay::Latest);
        let messages = Multicast::new(Replay::None);
        let id = Uuid::new_v4();

        let loop_task = tokio::spawn(run_loop(
            params,
            previous,
            rx,
            intake,
            states.clone(),
            messages.clone(),
            id,
        ));
        let scope = ScopeHandle::new(loop_task.abort_handle());

        // Supervisor: observes how the loop ended and flips the scope to
        // closed so lifecycle glue can await teardown.
        let supervisor_scope = scope.clone();
        tokio::spawn(async move {
            match loop_task.await {
                Ok(()) => debug!(feature = %id, "message loop terminated"),
                Err(err) if err.is_panic() => {
                    error!(feature = %id, "update panicked; update must be total over its message/state domain")
                }
                Err(_) => debug!(feature = %id, "message loop cancelled"),
            }
            supervisor_scope.mark_closed();
        });

        Self {
            dispatch,
            states,
            messages,
            scope,
            id,
        }
    }

    /// Enqueue `msg` for asynchronous processing; returns immediately.
    ///
    /// Messages dispatched sequentially by one caller are processed in that
    /// order; messages from different sources interleave.
    ///
    /// # Errors
    /// [`DispatchError::Closed`] after teardown,
    /// [`DispatchError::MailboxFull`] when the intake is at capacity.
    pub fn dispatch(&self, msg: M) -> Result<(), DispatchError> {
        if self.scope.is_cancelled() {
            return Err(DispatchError::Closed);
        }
        self.dispatch.try_send(msg)
    }

    /// Submit `msg`, suspending until it is admitted to the intake.
    ///
    /// Resolves on queue admission, not when the resulting transition
    /// completes.
    ///
    /// # Errors
    /// [`DispatchError::Closed`] after teardown.
    pub async fn sync_dispatch(&self, msg: M) -> Result<(), DispatchError> {
        if self.scope.is_cancelled() {
            return Err(DispatchError::Closed);
        }
        self.dispatch.send(msg).await
    }

    /// Subscribe to the state stream.
    ///
    /// Every new observer immediately receives the most recent state, then
    /// every subsequent one, in the exact order the loop produced them.
    /// Nothing is emitted until init has produced the first state.
    pub fn states(&self) -> StateStream<S> {
        self.states.subscribe()
    }

    /// Subscribe to the messages accepted by the loop, in processing order.
    ///
    /// Only messages accepted after subscribing are observed.
    pub fn messages(&self) -> MessageStream<M> {
        self.messages.subscribe()
    }

    /// A cloneable dispatch handle into this feature's intake.
    pub fn dispatcher(&self) -> Dispatch<M> {
        self.dispatch.clone()
    }

    /// Cloneable handle for observation and dispatch without ownership.
    pub fn handle(&self) -> FeatureHandle<S, M> {
        FeatureHandle {
            dispatch: self.dispatch.clone(),
            states: self.states.clone(),
            messages: self.messages.clone(),
            scope: self.scope.clone(),
        }
    }

    /// The runtime's cancellation boundary.
    pub fn scope(&self) -> &ScopeHandle {
        &self.scope
    }

    /// Tear the runtime down: stop message processing and abort all
    /// in-flight effects. Idempotent; also runs on drop.
    pub fn cancel(&self) {
        self.scope.cancel();
    }

    /// Instance id used in log fields.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Sequential sending of an unspecified number of messages.
    ///
    /// Runs `f` as an independent task with a dispatch handle; messages it
    /// sends through that handle in sequence are admitted in sequence. The
    /// task lives inside the runtime's lifetime: teardown stops it together
    /// with the in-flight effects.
    pub fn sequential_dispatch<F, Fut>(&self, f: F)
    where
        F: FnOnce(Dispatch<M>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let dispatch = self.dispatch.clone();
        let scope = self.scope.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = f(dispatch) => {}
                () = scope.closed() => {}
            }
        });
    }
}

impl<S: State, M: Message> Drop for Feature<S, M> {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

/// Lightweight handle for dispatching into and observing a feature.
///
/// Does not keep the runtime alive or tear it down; after cancellation,
/// dispatch through a handle fails with [`DispatchError::Closed`].
pub struct FeatureHandle<S: State, M: Message> {
    dispatch: Dispatch<M>,
    states: Multicast<S>,
    messages: Multicast<M>,
    scope: ScopeHandle,
}

impl<S: State, M: Message> FeatureHandle<S, M> {
    /// See [`Feature::dispatch`].
    pub fn dispatch(&self, msg: M) -> Result<(), DispatchError> {
        if self.scope.is_cancelled() {
            return Err(DispatchError::Closed);
        }
        self.dispatch.try_send(msg)
    }

    /// See [`Feature::sync_dispatch`].
    pub async fn sync_dispatch(&self, msg: M) -> Result<(), DispatchError> {
        if self.scope.is_cancelled() {
            return Err(DispatchError::Closed);
        }
        self.dispatch.send(msg).await
    }

    /// See [`Feature::states`].
    pub fn states(&self) -> StateStream<S> {
        self.states.subscribe()
    }

    /// See [`Feature::messages`].
    pub fn messages(&self) -> MessageStream<M> {
        self.messages.subscribe()
    }

    /// See [`Feature::dispatcher`].
    pub fn dispatcher(&self) -> Dispatch<M> {
        self.dispatch.clone()
    }

    /// See [`Feature::scope`].
    pub fn scope(&self) -> &ScopeHandle {
        &self.scope
    }
}

impl<S: State, M: Message> Clone for FeatureHandle<S, M> {
    fn clone(&self) -> Self {
        Self {
            dispatch: self.dispatch.clone(),
            states: self.states.clone(),
            messages: self.messages.clone(),
            scope: self.scope.clone(),
        }
    }
}

async fn run_loop<I, U, H>(
    params: FeatureParams<I, U, H>,
    previous: Option<U::State>,
    mut rx: mpsc::Receiver<U::Msg>,
    intake: mpsc::WeakSender<U::Msg>,
    states: Multicast<U::State>,
    messages: Multicast<U::Msg>,
    id: Uuid,
) where
    U: Update,
    I: Init<State = U::State, Effect = U::Effect>,
    H: EffectHandler<Effect = U::Effect, Msg = U::Msg>,
{
    let FeatureParams {
        init,
        update,
        effect_handler,
    } = params;
    let handler = Arc::new(effect_handler);

    let deps = match init.pre_effect().await {
        Ok(deps) => deps,
        Err(err) => {
            error!(
                feature = %id,
                error = %err,
                "dependency resolution failed; feature will not start"
            );
            return;
        }
    };

    let (initial, start_effects) = init.init(previous, deps);
    states.publish(initial.clone());
    let mut current = initial;

    // Effects run in a JoinSet owned by this task: aborting the loop drops
    // the set and cancels every in-flight effect transitively.
    let mut effects = JoinSet::new();

    // Start effects are scheduled before the first message is consumed.
    for effect in start_effects {
        spawn_effect(&mut effects, &handler, effect, &intake);
    }
    debug!(feature = %id, "message loop started");

    loop {
        tokio::select! {
            maybe_msg = rx.recv() => {
                // The loop holds no sender of its own, so `None` means every
                // dispatch handle (including per-effect clones) is gone and
                // the mailbox has drained.
                let Some(msg) = maybe_msg else { break };
                if messages.has_subscribers() {
                    messages.publish(msg.clone());
                }
                let (next, new_effects) = update.update(msg, &current);
                current = next;
                // Publish before reading the next message so observers see
                // every transition in causal order.
                states.publish(current.clone());
                for effect in new_effects {
                    spawn_effect(&mut effects, &handler, effect, &intake);
                }
            }
            Some(result) = effects.join_next(), if !effects.is_empty() => {
                reap_effect(id, result);
            }
        }
    }
    debug!(feature = %id, "intake closed");
}

fn spawn_effect<H>(
    tasks: &mut JoinSet<anyhow::Result<()>>,
    handler: &Arc<H>,
    effect: H::Effect,
    intake: &mpsc::WeakSender<H::Msg>,
) where
    H: EffectHandler,
{
    // Each effect gets a strong sender clone, so the intake stays open
    // exactly as long as something can still dispatch into it. A failed
    // upgrade means teardown already started; the effect is dropped.
    let Some(tx) = intake.upgrade() else { return };
    let handler = Arc::clone(handler);
    let dispatch = Dispatch::new(tx);
    tasks.spawn(async move { handler.handle(effect, dispatch).await });
}

/// Effect failures are local to the effect's task: observable in the logs,
/// never fatal to the loop.
fn reap_effect(id: Uuid, result: Result<anyhow::Result<()>, JoinError>) {
    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(feature = %id, error = %err, "effect failed"),
        Err(err) if err.is_panic() => warn!(feature = %id, "effect task panicked"),
        Err(_) => {}
    }
}
