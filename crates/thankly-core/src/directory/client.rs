//! Directory client trait.
//!
//! Defines the contract for the optional remote user directory.

use async_trait::async_trait;
use tracing::debug;

use super::model::DirectoryEntry;
use crate::identity::Identifier;

/// Best-effort access to the remote user directory.
///
/// Neither method reports failure: implementations log and degrade to an
/// empty result or a no-op. Callers never need error handling around the
/// directory.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Users whose nickname contains `term`, never including `exclude`.
    async fn search(&self, term: &str, exclude: &Identifier) -> Vec<DirectoryEntry>;

    /// Publishes (or refreshes) one entry. Fire-and-forget.
    async fn upsert(&self, entry: &DirectoryEntry);

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// Used when no directory is configured: finds nobody, stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDirectoryClient;

#[async_trait]
impl DirectoryClient for NullDirectoryClient {
    async fn search(&self, term: &str, _exclude: &Identifier) -> Vec<DirectoryEntry> {
        debug!("Directory disabled; search for '{}' returns nothing", term);
        Vec::new()
    }

    async fn upsert(&self, entry: &DirectoryEntry) {
        debug!("Directory disabled; not publishing {}", entry.identifier);
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
