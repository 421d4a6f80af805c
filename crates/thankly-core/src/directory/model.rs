//! Directory entry model.

use serde::{Deserialize, Serialize};

use crate::identity::Identifier;
use crate::profile::{Avatar, Profile};

/// A searchable copy of part of a profile.
///
/// Eventually consistent and never authoritative; the local partition wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub identifier: Identifier,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Avatar>,
}

impl DirectoryEntry {
    /// Case-insensitive substring match on the nickname.
    pub fn matches(&self, term: &str) -> bool {
        self.nickname
            .to_lowercase()
            .contains(&term.trim().to_lowercase())
    }
}

impl From<&Profile> for DirectoryEntry {
    fn from(profile: &Profile) -> Self {
        Self {
            identifier: profile.identifier.clone(),
            nickname: profile.nickname.clone(),
            avatar: profile.avatar.clone(),
        }
    }
}

/// Drops the excluded identifier and entries that do not match `term`.
///
/// Applied to whatever a backend returns, so a sloppy server cannot list
/// the searcher or unrelated users.
pub fn filter_results(
    entries: Vec<DirectoryEntry>,
    term: &str,
    exclude: &Identifier,
) -> Vec<DirectoryEntry> {
    entries
        .into_iter()
        .filter(|e| &e.identifier != exclude && e.matches(term))
        .collect()
}
