//! Structured storage keys.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::identity::Identifier;

/// A field inside one identifier's partition.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PartitionField {
    Nickname,
    Avatar,
    LastUpdated,
    Appreciations,
    TotalDays,
}

/// A browsing-context wide flag, not tied to any partition.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GlobalKey {
    /// Identifier the viewer last opened.
    CurrentIdentifier,
    /// The viewer's own identifier, fixed at signup.
    OriginalIdentifier,
    /// One-shot flag set by logging in with an existing identifier.
    CameFromLogin,
    Authenticated,
    AccountTier,
    DisplayName,
}

/// Composite key resolved by a [`KeyValueStore`](super::KeyValueStore).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    Partition {
        identifier: Identifier,
        field: PartitionField,
    },
    Global(GlobalKey),
}

impl StorageKey {
    pub fn partition(identifier: &Identifier, field: PartitionField) -> Self {
        Self::Partition {
            identifier: identifier.clone(),
            field,
        }
    }

    pub fn global(key: GlobalKey) -> Self {
        Self::Global(key)
    }
}
