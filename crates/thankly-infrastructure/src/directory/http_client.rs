//! HTTP implementation of the remote user directory.
//!
//! Endpoints:
//! - `GET  <base>/api/search-users?term=<t>&currentUserId=<id>`
//!   → `[{ "userId", "nickname", "profilePicture"? }]`
//! - `POST <base>/api/users/save` with `{ "userId", "nickname", "profilePicture" }`

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thankly_core::directory::{DirectoryClient, DirectoryEntry, filter_results};
use thankly_core::identity::Identifier;
use thankly_core::profile::Avatar;
use thankly_core::{Result, ThanklyError};
use thiserror::Error;
use tracing::{debug, warn};

/// Why a directory call degraded. Only ever logged.
#[derive(Debug, Error)]
enum DirectoryCallError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchUserDto {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    profile_picture: Option<String>,
}

impl SearchUserDto {
    /// Entries without a usable identifier are dropped.
    fn into_entry(self) -> Option<DirectoryEntry> {
        let identifier = Identifier::parse(self.user_id.as_deref()?).ok()?;
        Some(DirectoryEntry {
            identifier,
            nickname: self.nickname.unwrap_or_default(),
            avatar: self
                .profile_picture
                .filter(|uri| !uri.is_empty())
                .map(Avatar::from_uri),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveUserRequest<'a> {
    user_id: &'a str,
    nickname: &'a str,
    profile_picture: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct HttpDirectoryClient {
    client: Client,
    base_url: String,
}

impl HttpDirectoryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ThanklyError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn try_search(
        &self,
        term: &str,
        exclude: &Identifier,
    ) -> std::result::Result<Vec<DirectoryEntry>, DirectoryCallError> {
        let url = format!("{}/api/search-users", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("term", term), ("currentUserId", exclude.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DirectoryCallError::Status(response.status()));
        }

        let users: Vec<SearchUserDto> = response.json().await?;
        let entries = users.into_iter().filter_map(SearchUserDto::into_entry).collect();
        Ok(filter_results(entries, term, exclude))
    }

    async fn try_upsert(&self, entry: &DirectoryEntry) -> std::result::Result<(), DirectoryCallError> {
        let url = format!("{}/api/users/save", self.base_url);
        let body = SaveUserRequest {
            user_id: entry.identifier.as_str(),
            nickname: &entry.nickname,
            profile_picture: entry.avatar.as_ref().map(Avatar::as_uri),
        };
        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(DirectoryCallError::Status(response.status()));
        }
        Ok(())
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn search(&self, term: &str, exclude: &Identifier) -> Vec<DirectoryEntry> {
        match self.try_search(term, exclude).await {
            Ok(entries) => {
                debug!("Directory search '{}' returned {} users", term, entries.len());
                entries
            }
            Err(e) => {
                warn!("Directory search '{}' failed, showing no results: {}", term, e);
                Vec::new()
            }
        }
    }

    async fn upsert(&self, entry: &DirectoryEntry) {
        match self.try_upsert(entry).await {
            Ok(()) => debug!("Published {} to the directory", entry.identifier),
            Err(e) => warn!("Failed to publish {} to the directory: {}", entry.identifier, e),
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
