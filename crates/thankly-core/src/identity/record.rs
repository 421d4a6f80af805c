//! The durable identity flags of a browsing context.

use serde::de::DeserializeOwned;

use super::Identifier;
use crate::error::Result;
use crate::storage::{GlobalKey, KeyValueStore, KeyValueStoreExt, StorageKey};
use crate::tier::AccountTier;

/// Everything the identity session keeps between page loads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityRecord {
    /// Identifier opened most recently (or chosen at login).
    pub current: Option<Identifier>,
    /// The viewer's own identifier.
    pub original: Option<Identifier>,
    /// Set by logging in with an existing identifier; consumed by the next
    /// resolution.
    pub came_from_login: bool,
    pub authenticated: bool,
    pub tier: Option<AccountTier>,
    pub display_name: Option<String>,
}

impl IdentityRecord {
    /// Reads the flags; a value that no longer deserializes counts as unset.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        Ok(Self {
            current: read_lenient(store, GlobalKey::CurrentIdentifier)?,
            original: read_lenient(store, GlobalKey::OriginalIdentifier)?,
            came_from_login: read_lenient(store, GlobalKey::CameFromLogin)?.unwrap_or(false),
            authenticated: read_lenient(store, GlobalKey::Authenticated)?.unwrap_or(false),
            tier: read_lenient(store, GlobalKey::AccountTier)?,
            display_name: read_lenient(store, GlobalKey::DisplayName)?,
        })
    }

    /// Writes every flag; unset values and false flags are removed.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        write_optional(store, GlobalKey::CurrentIdentifier, self.current.as_ref())?;
        write_optional(store, GlobalKey::OriginalIdentifier, self.original.as_ref())?;
        write_optional(
            store,
            GlobalKey::CameFromLogin,
            self.came_from_login.then_some(&true),
        )?;
        write_optional(
            store,
            GlobalKey::Authenticated,
            self.authenticated.then_some(&true),
        )?;
        write_optional(store, GlobalKey::AccountTier, self.tier.as_ref())?;
        write_optional(store, GlobalKey::DisplayName, self.display_name.as_ref())?;
        Ok(())
    }

    /// Tier used for quotas; unset counts as guest.
    pub fn effective_tier(&self) -> AccountTier {
        self.tier.unwrap_or_default()
    }
}

fn read_lenient<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: GlobalKey,
) -> Result<Option<T>> {
    store.get_lenient(&StorageKey::global(key))
}

fn write_optional<T: serde::Serialize>(
    store: &dyn KeyValueStore,
    key: GlobalKey,
    value: Option<&T>,
) -> Result<()> {
    let key = StorageKey::global(key);
    match value {
        Some(value) => store.set_as(&key, value),
        None => store.remove(&key),
    }
}
