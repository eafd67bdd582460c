//! Model-View-Intent primitives.
//!
//! UI surfaces owned by the page agent keep their state as a value and
//! change it only through a reducer, via a [`Store`].
//!
//! ```text
//! Intent ──→ Store::dispatch ──→ Reducer ──→ State ──→ DOM
//! ```

mod store;

pub use store::Store;

/// Marker for state values: cloned to derive new states, compared to
/// detect changes, defaulted to the surface's resting state.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}

/// Marker for user actions and system events fed to a reducer.
pub trait Intent: Send + 'static {}

/// The only place state transitions happen: `(State, Intent) -> State`,
/// with no side effects.
pub trait Reducer {
    type State: UiState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
