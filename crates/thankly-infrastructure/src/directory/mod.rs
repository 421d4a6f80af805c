//! Directory adapters and startup selection.

mod http_client;

pub use http_client::HttpDirectoryClient;

use std::sync::Arc;
use thankly_core::config::DirectorySettings;
use thankly_core::directory::{DirectoryClient, NullDirectoryClient};
use tracing::{info, warn};

/// Picks the directory implementation for this run.
///
/// No base URL, or a client that cannot be built, selects the null client;
/// the journal works the same either way.
pub fn directory_client(settings: &DirectorySettings) -> Arc<dyn DirectoryClient> {
    let Some(base_url) = settings.base_url() else {
        info!("No directory configured; user search is disabled");
        return Arc::new(NullDirectoryClient);
    };

    match HttpDirectoryClient::new(base_url, settings.timeout()) {
        Ok(client) => {
            info!("Using directory at {}", client.base_url());
            Arc::new(client)
        }
        Err(e) => {
            warn!("Directory disabled: {}", e);
            Arc::new(NullDirectoryClient)
        }
    }
}
