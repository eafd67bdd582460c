use std::fmt::Debug;
use std::marker::PhantomData;

use super::Reducer;

/// Holds the current state of one surface and applies intents to it.
pub struct Store<R: Reducer> {
    state: R::State,
    _reducer: PhantomData<R>,
}

impl<R: Reducer> Default for Store<R> {
    fn default() -> Self {
        Self {
            state: R::State::default(),
            _reducer: PhantomData,
        }
    }
}

impl<R: Reducer> Store<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &R::State {
        &self.state
    }

    /// Run `intent` through the reducer. Returns whether the state changed.
    pub fn dispatch(&mut self, intent: R::Intent) -> bool
    where
        R::State: Debug,
    {
        let next = R::reduce(self.state.clone(), intent);
        let changed = next != self.state;
        if changed {
            tracing::trace!(from = ?self.state, to = ?next, "State transition");
            self.state = next;
        }
        changed
    }
}
