//! External persistence collaborator.
//!
//! The runtime itself never persists anything; hosting glue subscribes to
//! the state stream and saves every publication, then feeds the loaded
//! state back in as `previous` when the feature is re-created. The blob
//! format is opaque to the runtime.

use std::io::ErrorKind;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::binder::Binding;
use crate::core::State;
use crate::stream::StateStream;

/// Saves and restores feature state across surface re-creation.
pub trait StateStore<S>: Send + 'static {
    /// Persist one state snapshot.
    fn save(&self, state: &S) -> anyhow::Result<()>;

    /// Load the previously persisted state, `None` when nothing was saved.
    fn load(&self) -> anyhow::Result<Option<S>>;
}

/// JSON-on-disk [`StateStore`].
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl<S> StateStore<S> for JsonFileStore
where
    S: Serialize + DeserializeOwned + Send + 'static,
{
    fn save(&self, state: &S) -> anyhow::Result<()> {
        let json = serde_json::to_vec(state)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn load(&self) -> anyhow::Result<Option<S>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

/// Save every published state to `store`.
///
/// Runs as an independent task; a failed save is logged and the next state
/// is still attempted. Ends when the feature is dropped or the returned
/// [`Binding`] is dropped.
pub fn persist<S, St>(mut states: StateStream<S>, store: St) -> Binding
where
    S: State,
    St: StateStore<S>,
{
    Binding::spawn(async move {
        while let Some(state) = states.next().await {
            if let Err(err) = store.save(&state) {
                warn!(error = %err, "failed to persist state");
            }
        }
    })
}
