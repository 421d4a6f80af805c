use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{KeyValueStore, StorageKey};
use crate::error::Result;

/// Process-local store, used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: RwLock<BTreeMap<StorageKey, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every stored entry, for before/after comparisons.
    pub fn snapshot(&self) -> BTreeMap<StorageKey, Value> {
        self.values.read().map(|v| v.clone()).unwrap_or_default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &StorageKey) -> Result<Option<Value>> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &StorageKey, value: Value) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.clone(), value);
        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identifier;
    use crate::storage::{GlobalKey, KeyValueStoreExt, PartitionField};

    #[test]
    fn test_partitions_do_not_collide() {
        let store = InMemoryStore::new();
        let alice = Identifier::parse("alice-1").unwrap();
        let alice_nick = Identifier::parse("alice-1nickname").unwrap();

        store
            .set_as(&StorageKey::partition(&alice, PartitionField::Nickname), "Al")
            .unwrap();

        let other: Option<String> = store
            .get_as(&StorageKey::partition(&alice_nick, PartitionField::Nickname))
            .unwrap();
        assert!(other.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_flags_default_to_false_and_remove_is_idempotent() {
        let store = InMemoryStore::new();
        assert!(!store.get_flag(GlobalKey::CameFromLogin).unwrap());

        let key = StorageKey::global(GlobalKey::CameFromLogin);
        store.set_as(&key, &true).unwrap();
        assert!(store.get_flag(GlobalKey::CameFromLogin).unwrap());

        store.remove(&key).unwrap();
        store.remove(&key).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_wrong_shape_is_a_serialization_error() {
        let store = InMemoryStore::new();
        let key = StorageKey::global(GlobalKey::Authenticated);
        store.set(&key, Value::String("yes".into())).unwrap();
        let err = store.get_as::<bool>(&key).unwrap_err();
        assert!(err.is_serialization());
    }
}
