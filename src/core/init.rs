//! Init trait: produces the first state and startup effects.

use std::future::Future;
use std::marker::PhantomData;

use super::state::State;
use super::update::Effects;

/// Produces the initial state of a feature, optionally from a previously
/// persisted state and asynchronously resolved dependencies.
///
/// `pre_effect` runs exactly once per runtime lifetime, before the first
/// state is computed. An error here is fatal: there is no valid state to
/// publish without dependencies, so the runtime logs the failure and closes
/// before emitting anything.
///
/// `previous` is `Some` when the hosting surface was re-created and its
/// state was restored externally. Whether to trust it as-is or re-validate
/// it against fresh dependencies is a policy decision of each `Init`
/// implementation, not of the runtime.
pub trait Init: Send + 'static {
    /// The state type produced.
    type State: State;

    /// The effect type of the startup effects.
    type Effect: Send + 'static;

    /// Dependencies resolved by [`pre_effect`](Init::pre_effect).
    type Deps: Send + 'static;

    /// Resolve asynchronous dependencies (e.g. a repository handle).
    fn pre_effect(&self) -> impl Future<Output = anyhow::Result<Self::Deps>> + Send;

    /// Create the first state and startup effects.
    fn init(
        &self,
        previous: Option<Self::State>,
        deps: Self::Deps,
    ) -> (Self::State, Effects<Self::Effect>);
}

/// [`Init`] from a plain closure, for features without a pre-effect.
pub struct InitFn<S, E, F> {
    f: F,
    _marker: PhantomData<fn() -> (S, E)>,
}

impl<S, E, F> InitFn<S, E, F>
where
    S: State,
    E: Send + 'static,
    F: Fn(Option<S>) -> (S, Effects<E>) + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<S, E, F> Init for InitFn<S, E, F>
where
    S: State,
    E: Send + 'static,
    F: Fn(Option<S>) -> (S, Effects<E>) + Send + 'static,
{
    type State = S;
    type Effect = E;
    type Deps = ();

    fn pre_effect(&self) -> impl Future<Output = anyhow::Result<()>> + Send {
        std::future::ready(Ok(()))
    }

    fn init(&self, previous: Option<S>, _deps: ()) -> (S, Effects<E>) {
        (self.f)(previous)
    }
}
