//! Consistent-load scenario: an intermediate progress state is always
//! observed between the request and the loaded result, in exactly that
//! order.

mod common;

use uniflow::{
    Dispatch, EffectHandler, Effects, Feature, FeatureParams, InitFn, Message, State, Update,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct User {
    id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LoadState {
    progress: bool,
    user: Option<User>,
}

impl State for LoadState {}

#[derive(Debug, Clone)]
enum LoadMsg {
    LoadUserById(u32),
    UserWasLoaded(User),
}

impl Message for LoadMsg {}

#[derive(Debug, PartialEq, Eq)]
enum LoadEffect {
    LoadUser(u32),
}

struct LoadUpdate;

impl Update for LoadUpdate {
    type State = LoadState;
    type Msg = LoadMsg;
    type Effect = LoadEffect;

    fn update(&self, msg: LoadMsg, state: &LoadState) -> (LoadState, Effects<LoadEffect>) {
        match msg {
            LoadMsg::LoadUserById(id) => (
                LoadState {
                    progress: true,
                    user: state.user.clone(),
                },
                vec![LoadEffect::LoadUser(id)],
            ),
            LoadMsg::UserWasLoaded(user) => (
                LoadState {
                    progress: false,
                    user: Some(user),
                },
                Vec::new(),
            ),
        }
    }
}

struct LoadEffects;

impl EffectHandler for LoadEffects {
    type Effect = LoadEffect;
    type Msg = LoadMsg;

    async fn handle(&self, effect: LoadEffect, dispatch: Dispatch<LoadMsg>) -> anyhow::Result<()> {
        match effect {
            LoadEffect::LoadUser(id) => {
                // Stands in for repository I/O.
                tokio::task::yield_now().await;
                dispatch.send(LoadMsg::UserWasLoaded(User { id })).await?;
                Ok(())
            }
        }
    }
}

fn spawn_feature() -> Feature<LoadState, LoadMsg> {
    Feature::spawn(
        None,
        FeatureParams {
            init: InitFn::new(|previous| {
                (
                    previous.unwrap_or(LoadState {
                        progress: false,
                        user: None,
                    }),
                    Vec::new(),
                )
            }),
            update: LoadUpdate,
            effect_handler: LoadEffects,
        },
    )
}

#[test]
fn load_request_sets_progress_and_schedules_load() {
    let state = LoadState {
        progress: false,
        user: None,
    };
    let (next, effects) = LoadUpdate.update(LoadMsg::LoadUserById(101), &state);
    assert_eq!(
        next,
        LoadState {
            progress: true,
            user: None
        }
    );
    assert_eq!(effects, vec![LoadEffect::LoadUser(101)]);
}

#[test]
fn loaded_user_clears_progress() {
    let state = LoadState {
        progress: true,
        user: None,
    };
    let (next, effects) = LoadUpdate.update(LoadMsg::UserWasLoaded(User { id: 101 }), &state);
    assert_eq!(
        next,
        LoadState {
            progress: false,
            user: Some(User { id: 101 })
        }
    );
    assert!(effects.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn observed_sequence_is_exactly_request_progress_loaded() {
    common::init_tracing();
    let feature = spawn_feature();
    let mut states = feature.states();

    feature.sync_dispatch(LoadMsg::LoadUserById(101)).await.unwrap();

    let expected = [
        LoadState {
            progress: false,
            user: None,
        },
        LoadState {
            progress: true,
            user: None,
        },
        LoadState {
            progress: false,
            user: Some(User { id: 101 }),
        },
    ];
    for want in expected {
        let state = tokio::time::timeout(common::SETTLE, states.next())
            .await
            .expect("stream stalled")
            .expect("stream ended");
        assert_eq!(state, want);
    }

    // And nothing after the final state.
    let extra = tokio::time::timeout(common::QUIET, states.next()).await;
    assert!(extra.is_err(), "unexpected extra state: {extra:?}");
}
