//! In-process session store.

use super::session::SessionStore;
use crate::models::StateDocument;
use std::sync::{Mutex, PoisonError};

/// Session store held in memory.
///
/// Shares state between handlers in one process only. Used by tests,
/// benchmarks and embedders that run the guard inside a long-lived host.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    state: Mutex<StateDocument>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `doc`.
    #[must_use]
    pub const fn with_document(doc: StateDocument) -> Self {
        Self {
            state: Mutex::new(doc),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self) -> StateDocument {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, transform: &mut dyn FnMut(&mut StateDocument)) {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        transform(&mut guard);
    }
}
