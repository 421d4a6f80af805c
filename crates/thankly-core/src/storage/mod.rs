//! Key/value persistence seam.
//!
//! Everything the journal remembers lives behind [`KeyValueStore`]: one
//! partition per identifier plus a handful of global flags. Implementations
//! are synchronous; the browsing context is the only writer.

mod key;
mod memory;

pub use key::{GlobalKey, PartitionField, StorageKey};
pub use memory::InMemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::Result;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &StorageKey) -> Result<Option<Value>>;

    fn set(&self, key: &StorageKey, value: Value) -> Result<()>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &StorageKey) -> Result<()>;
}

/// Typed helpers layered over the raw JSON values.
pub trait KeyValueStoreExt: KeyValueStore {
    /// Reads and deserializes a value.
    ///
    /// A value of the wrong shape is reported as a serialization error so
    /// callers can decide whether to treat it as missing.
    fn get_as<T: DeserializeOwned>(&self, key: &StorageKey) -> Result<Option<T>> {
        match self.get(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Like [`get_as`](Self::get_as), but a value of the wrong shape is
    /// logged and reported as absent.
    fn get_lenient<T: DeserializeOwned>(&self, key: &StorageKey) -> Result<Option<T>> {
        match self.get_as::<T>(key) {
            Ok(value) => Ok(value),
            Err(e) if e.is_serialization() => {
                warn!("Ignoring unreadable value at {:?}: {}", key, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn set_as<T: Serialize + ?Sized>(&self, key: &StorageKey, value: &T) -> Result<()> {
        self.set(key, serde_json::to_value(value)?)
    }

    fn get_flag(&self, key: GlobalKey) -> Result<bool> {
        Ok(self
            .get_as::<bool>(&StorageKey::global(key))?
            .unwrap_or(false))
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}
