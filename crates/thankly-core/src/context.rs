//! Shared handles for one browsing context.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::storage::{InMemoryStore, KeyValueStore};

/// Durable storage plus time source, handed to the identity session, the
/// profile service and the journal store.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Uses the wall clock.
    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }

    /// Fresh in-memory store and wall clock.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()))
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}
