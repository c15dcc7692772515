//! State → handler dispatch table.

use super::Handler;
use crate::core::State;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maps each state to the handler that renders and interprets it.
///
/// Built once at startup and read-only afterwards; cloning is cheap.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<State, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `state`, replacing any earlier registration.
    pub fn register<H>(self, state: State, handler: H) -> Self
    where
        H: Handler + 'static,
    {
        self.register_shared(state, Arc::new(handler))
    }

    /// Register a handler shared with other states or owners.
    pub fn register_shared(mut self, state: State, handler: Arc<dyn Handler>) -> Self {
        self.handlers.insert(state, handler);
        self
    }

    pub fn get(&self, state: State) -> Option<&dyn Handler> {
        self.handlers.get(&state).map(|h| h.as_ref())
    }

    pub fn contains(&self, state: State) -> bool {
        self.handlers.contains_key(&state)
    }

    /// States with no registered handler, in id order.
    pub fn missing(&self) -> Vec<State> {
        State::ALL
            .iter()
            .copied()
            .filter(|s| !self.contains(*s))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut states: Vec<_> = self.handlers.keys().copied().collect();
        states.sort();
        f.debug_struct("HandlerRegistry")
            .field("states", &states)
            .finish()
    }
}
