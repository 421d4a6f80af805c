//! Background publishing of the owner's profile to the directory.

use std::sync::Arc;
use thankly_core::directory::{DirectoryClient, DirectoryEntry};
use thankly_core::profile::Profile;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// Fire-and-forget upserts.
///
/// The upsert runs on the current tokio runtime; callers may await the
/// handle (tests, orderly shutdown) but never need to.
#[derive(Clone)]
pub struct DirectorySync {
    client: Arc<dyn DirectoryClient>,
}

impl DirectorySync {
    pub fn new(client: Arc<dyn DirectoryClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn DirectoryClient> {
        &self.client
    }

    /// Spawns an upsert of `profile`.
    ///
    /// Outside a runtime nothing is published and `None` is returned.
    pub fn publish(&self, profile: &Profile) -> Option<JoinHandle<()>> {
        let Ok(handle) = Handle::try_current() else {
            debug!("No async runtime; skipping directory upsert of {}", profile.identifier);
            return None;
        };

        let client = Arc::clone(&self.client);
        let entry = DirectoryEntry::from(profile);
        Some(handle.spawn(async move {
            client.upsert(&entry).await;
        }))
    }
}

impl std::fmt::Debug for DirectorySync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectorySync")
            .field("client", &self.client.name())
            .finish()
    }
}
