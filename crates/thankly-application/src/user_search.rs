//! Debounced user search.
//!
//! Every call takes a fresh generation number. A call only sends its
//! request if no newer call arrived during the debounce window, and only
//! publishes its results if no newer call arrived while the request was in
//! flight. Stale responses are dropped, never shown.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thankly_core::config::SearchSettings;
use thankly_core::directory::{DirectoryClient, DirectoryEntry};
use thankly_core::identity::Identifier;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// These results are now the visible ones.
    Applied(Vec<DirectoryEntry>),
    /// The term was too short; visible results were cleared.
    TooShort,
    /// A newer search started; this one changed nothing.
    Superseded,
}

pub struct UserSearch {
    client: Arc<dyn DirectoryClient>,
    settings: SearchSettings,
    generation: AtomicU64,
    results: RwLock<Vec<DirectoryEntry>>,
}

impl UserSearch {
    pub fn new(client: Arc<dyn DirectoryClient>, settings: SearchSettings) -> Self {
        Self {
            client,
            settings,
            generation: AtomicU64::new(0),
            results: RwLock::new(Vec::new()),
        }
    }

    /// Results of the latest applied search.
    pub async fn results(&self) -> Vec<DirectoryEntry> {
        self.results.read().await.clone()
    }

    /// Searches for `term` on behalf of `viewer`, who is never listed.
    pub async fn search(&self, term: &str, viewer: &Identifier) -> SearchOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let term = term.trim();

        if term.chars().count() < self.settings.min_term_length {
            if self.is_latest(generation) {
                self.results.write().await.clear();
            }
            return SearchOutcome::TooShort;
        }

        tokio::time::sleep(self.settings.debounce()).await;
        if !self.is_latest(generation) {
            debug!("Search '{}' superseded before sending", term);
            return SearchOutcome::Superseded;
        }

        let found = self.client.search(term, viewer).await;

        let mut visible = self.results.write().await;
        if !self.is_latest(generation) {
            debug!("Dropping stale results for '{}'", term);
            return SearchOutcome::Superseded;
        }
        *visible = found.clone();
        SearchOutcome::Applied(found)
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
