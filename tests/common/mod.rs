//! Shared test utilities.

#![allow(dead_code, unused_imports)]

use std::time::Duration;

use uniflow::StateStream;

/// Upper bound for anything the runtime should do promptly.
pub const SETTLE: Duration = Duration::from_secs(5);

/// Short window used to assert that nothing further happens.
pub const QUIET: Duration = Duration::from_millis(150);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Read states until one matches `pred`, failing the test after [`SETTLE`].
pub async fn wait_for_state<S, P>(states: &mut StateStream<S>, pred: P) -> S
where
    P: Fn(&S) -> bool,
{
    tokio::time::timeout(SETTLE, async {
        loop {
            let state = states.next().await.expect("state stream ended");
            if pred(&state) {
                return state;
            }
        }
    })
    .await
    .expect("feature did not settle in time")
}
