//! Profile domain model.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::identity::Identifier;

/// Longest nickname accepted from the settings panel.
pub const MAX_NICKNAME_CHARS: usize = 50;

/// Profile picture stored as a `data:` URI (or any URL the user pasted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Avatar(String);

impl Avatar {
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Encodes raw image bytes as `data:<mime>;base64,<payload>`.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
    }

    pub fn as_uri(&self) -> &str {
        &self.0
    }

    /// Decodes a base64 `data:` URI back into bytes; `None` for plain URLs.
    pub fn decode_bytes(&self) -> Option<Vec<u8>> {
        let (_, payload) = self.0.strip_prefix("data:")?.split_once(";base64,")?;
        STANDARD.decode(payload).ok()
    }
}

/// Per-identifier profile: nickname, avatar and last edit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub identifier: Identifier,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Avatar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// `User<0-9999>`, used until the owner picks a nickname.
pub fn default_nickname<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("User{}", rng.gen_range(0..=9999u32))
}
