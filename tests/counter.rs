//! Counter scenario: concurrent effects all land, sequential dispatch folds
//! deterministically.

mod common;

use uniflow::{
    Dispatch, EffectHandler, Effects, Feature, FeatureParams, InitFn, Message, State, Update,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct CounterState {
    count: u32,
}

impl State for CounterState {}

#[derive(Debug, Clone)]
enum CounterMsg {
    Increment,
    Add(u32),
}

impl Message for CounterMsg {}

#[derive(Debug, PartialEq, Eq)]
enum CounterEffect {
    RepeatIncrement { times: u32 },
}

struct CounterUpdate;

impl Update for CounterUpdate {
    type State = CounterState;
    type Msg = CounterMsg;
    type Effect = CounterEffect;

    fn update(&self, msg: CounterMsg, state: &CounterState) -> (CounterState, Effects<CounterEffect>) {
        match msg {
            CounterMsg::Increment => (
                CounterState {
                    count: state.count + 1,
                },
                Vec::new(),
            ),
            CounterMsg::Add(n) => (
                CounterState {
                    count: state.count + n,
                },
                Vec::new(),
            ),
        }
    }
}

struct CounterEffects;

impl EffectHandler for CounterEffects {
    type Effect = CounterEffect;
    type Msg = CounterMsg;

    async fn handle(
        &self,
        effect: CounterEffect,
        dispatch: Dispatch<CounterMsg>,
    ) -> anyhow::Result<()> {
        match effect {
            CounterEffect::RepeatIncrement { times } => {
                for _ in 0..times {
                    dispatch.send(CounterMsg::Increment).await?;
                }
                Ok(())
            }
        }
    }
}

fn three_incrementers() -> InitFn<
    CounterState,
    CounterEffect,
    impl Fn(Option<CounterState>) -> (CounterState, Effects<CounterEffect>) + Send + 'static,
> {
    InitFn::new(|previous| {
        (
            previous.unwrap_or(CounterState { count: 0 }),
            vec![
                CounterEffect::RepeatIncrement { times: 50 },
                CounterEffect::RepeatIncrement { times: 50 },
                CounterEffect::RepeatIncrement { times: 50 },
            ],
        )
    })
}

fn quiet_init() -> InitFn<
    CounterState,
    CounterEffect,
    impl Fn(Option<CounterState>) -> (CounterState, Effects<CounterEffect>) + Send + 'static,
> {
    InitFn::new(|previous| (previous.unwrap_or(CounterState { count: 0 }), Vec::new()))
}

#[test]
fn update_is_deterministic() {
    let state = CounterState { count: 7 };
    let first = CounterUpdate.update(CounterMsg::Increment, &state);
    let second = CounterUpdate.update(CounterMsg::Increment, &state);
    assert_eq!(first, second);
    assert_eq!(first.0, CounterState { count: 8 });
}

#[tokio::test(flavor = "multi_thread")]
async fn three_effects_of_fifty_reach_150() {
    common::init_tracing();
    let feature = Feature::spawn(
        None,
        FeatureParams {
            init: three_incrementers(),
            update: CounterUpdate,
            effect_handler: CounterEffects,
        },
    );
    let mut states = feature.states();
    let settled = common::wait_for_state(&mut states, |s| s.count == 150).await;
    assert_eq!(settled, CounterState { count: 150 });
}

#[tokio::test]
async fn initial_state_is_observed_first() {
    common::init_tracing();
    let feature = Feature::spawn(
        None,
        FeatureParams {
            init: quiet_init(),
            update: CounterUpdate,
            effect_handler: CounterEffects,
        },
    );
    let mut states = feature.states();
    feature.sync_dispatch(CounterMsg::Increment).await.unwrap();
    assert_eq!(states.next().await, Some(CounterState { count: 0 }));
    assert_eq!(states.next().await, Some(CounterState { count: 1 }));
}

#[tokio::test]
async fn sequential_dispatch_folds_in_order() {
    common::init_tracing();
    let feature = Feature::spawn(
        None,
        FeatureParams {
            init: quiet_init(),
            update: CounterUpdate,
            effect_handler: CounterEffects,
        },
    );
    let mut states = feature.states();

    let increments = [1u32, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    for n in increments {
        feature.sync_dispatch(CounterMsg::Add(n)).await.unwrap();
    }

    // The observed sequence is exactly the fold: no state skipped, no
    // message dropped.
    let mut expected = vec![0u32];
    let mut sum = 0;
    for n in increments {
        sum += n;
        expected.push(sum);
    }
    for want in expected {
        let state = tokio::time::timeout(common::SETTLE, states.next())
            .await
            .expect("stream stalled")
            .expect("stream ended");
        assert_eq!(state.count, want);
    }
}

#[tokio::test]
async fn sequential_dispatch_helper_preserves_order() {
    common::init_tracing();
    let feature = Feature::spawn(
        None,
        FeatureParams {
            init: quiet_init(),
            update: CounterUpdate,
            effect_handler: CounterEffects,
        },
    );
    let mut states = feature.states();
    feature.sequential_dispatch(|dispatch| async move {
        for n in [10u32, 20, 30] {
            let _ = dispatch.send(CounterMsg::Add(n)).await;
        }
    });
    for want in [0u32, 10, 30, 60] {
        let state = common::wait_for_state(&mut states, |s| s.count == want).await;
        assert_eq!(state.count, want);
    }
}
