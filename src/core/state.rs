//! Base trait for feature state.

/// Marker trait for state objects.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (all data the feature needs at a point in time)
///
/// Exactly one current state exists per runtime at any time; it is replaced,
/// never mutated, on each transition. Error conditions have no channel of
/// their own: anything observers must react to is modeled as a field in the
/// state itself.
pub trait State: Clone + Send + 'static {}
