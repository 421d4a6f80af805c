//! File-backed [`KeyValueStore`].
//!
//! # Layout
//!
//! ```text
//! <data dir>/
//! ├── globals.json              # browsing-context flags
//! └── partitions/
//!     └── <escaped id>.json     # one document per identifier
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thankly_core::identity::Identifier;
use thankly_core::storage::{KeyValueStore, StorageKey};
use thankly_core::{Result, ThanklyError};
use tracing::debug;

use super::atomic_file::AtomicFile;

/// Layout version written into every document.
pub const DOCUMENT_VERSION: u32 = 1;

const PARTITIONS_DIR: &str = "partitions";
const GLOBALS_FILE: &str = "globals.json";

/// One JSON document: a version tag plus field name → value.
///
/// Unknown fields are carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub version: u32,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Default for StoredDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            fields: BTreeMap::new(),
        }
    }
}

/// Persists partitions and global flags under one data directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Identifiers that have a partition on disk, sorted.
    pub fn identifiers(&self) -> Result<Vec<Identifier>> {
        let dir = self.root.join(PARTITIONS_DIR);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut identifiers = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(identifier) =
                unescape_file_stem(stem).and_then(|raw| Identifier::parse(&raw).ok())
            {
                identifiers.push(identifier);
            }
        }
        identifiers.sort();
        Ok(identifiers)
    }

    fn document(&self, key: &StorageKey) -> (AtomicFile<StoredDocument>, String) {
        match key {
            StorageKey::Partition { identifier, field } => {
                let file_name = format!("{}.json", escape_file_stem(identifier.as_str()));
                (
                    AtomicFile::new(self.root.join(PARTITIONS_DIR).join(file_name)),
                    field.as_ref().to_string(),
                )
            }
            StorageKey::Global(global) => (
                AtomicFile::new(self.root.join(GLOBALS_FILE)),
                global.as_ref().to_string(),
            ),
        }
    }

    fn load(file: &AtomicFile<StoredDocument>) -> Result<Option<StoredDocument>> {
        let Some(document) = file.load()? else {
            return Ok(None);
        };
        if document.version > DOCUMENT_VERSION {
            return Err(ThanklyError::data_access(format!(
                "{} has layout version {}, newer than supported {}",
                file.path().display(),
                document.version,
                DOCUMENT_VERSION
            )));
        }
        Ok(Some(document))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &StorageKey) -> Result<Option<Value>> {
        let (file, field) = self.document(key);
        Ok(Self::load(&file)?.and_then(|mut doc| doc.fields.remove(&field)))
    }

    fn set(&self, key: &StorageKey, value: Value) -> Result<()> {
        let (file, field) = self.document(key);
        file.update(|doc| {
            doc.version = DOCUMENT_VERSION;
            doc.fields.insert(field, value);
        })?;
        debug!("Stored {:?} in {}", key, file.path().display());
        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> Result<()> {
        let (file, field) = self.document(key);
        if !file.exists() {
            return Ok(());
        }
        file.update(|doc| {
            doc.fields.remove(&field);
        })?;
        Ok(())
    }
}

/// Percent-encodes everything outside `[A-Za-z0-9-._~]`.
///
/// `/` and `\` never survive, so an identifier cannot name a path outside the
/// partitions directory.
pub fn escape_file_stem(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Inverse of [`escape_file_stem`]; `None` when the bytes are not UTF-8.
pub fn unescape_file_stem(stem: &str) -> Option<String> {
    urlencoding::decode(stem).ok().map(|decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use thankly_core::storage::{GlobalKey, KeyValueStoreExt, PartitionField};

    fn id(raw: &str) -> Identifier {
        Identifier::parse(raw).unwrap()
    }

    #[test]
    fn test_escape_round_trip() {
        for raw in ["alice-1", "../etc-passwd", "名前-x", "a b-%41"] {
            let escaped = escape_file_stem(raw);
            assert!(!escaped.contains('/'));
            assert!(escaped.is_ascii());
            assert_eq!(unescape_file_stem(&escaped).as_deref(), Some(raw));
        }
        assert!(unescape_file_stem("bad%FF").is_none());
    }

    #[test]
    fn test_values_persist_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let alice = id("alice-1");
        {
            let store = FileKeyValueStore::new(temp_dir.path().to_path_buf());
            store
                .set_as(&StorageKey::partition(&alice, PartitionField::Nickname), "Al")
                .unwrap();
            store
                .set_as(&StorageKey::global(GlobalKey::Authenticated), &true)
                .unwrap();
        }

        let store = FileKeyValueStore::new(temp_dir.path().to_path_buf());
        let nickname: Option<String> = store
            .get_as(&StorageKey::partition(&alice, PartitionField::Nickname))
            .unwrap();
        assert_eq!(nickname.as_deref(), Some("Al"));
        assert!(store.get_flag(GlobalKey::Authenticated).unwrap());
        assert_eq!(store.identifiers().unwrap(), vec![alice]);
    }

    #[test]
    fn test_hostile_identifier_stays_inside_root() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("data"));
        let sneaky = id("../../escape-1");
        store
            .set(&StorageKey::partition(&sneaky, PartitionField::Nickname), json!("x"))
            .unwrap();

        assert!(!temp_dir.path().join("escape-1.json").exists());
        assert_eq!(store.identifiers().unwrap(), vec![sneaky]);
    }

    #[test]
    fn test_remove_is_idempotent_and_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().to_path_buf());
        let key = StorageKey::global(GlobalKey::CameFromLogin);

        store.remove(&key).unwrap();
        assert!(!temp_dir.path().join(GLOBALS_FILE).exists());

        store.set(&key, json!(true)).unwrap();
        store.remove(&key).unwrap();
        store.remove(&key).unwrap();
        assert!(store.get(&key).unwrap().is_none());
    }

    #[test]
    fn test_document_carries_version_and_unknown_fields() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().to_path_buf());
        let path = temp_dir.path().join(GLOBALS_FILE);
        fs::write(&path, r#"{"version":1,"fields":{"legacy_flag":42}}"#).unwrap();

        store
            .set(&StorageKey::global(GlobalKey::DisplayName), json!("Alice"))
            .unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], DOCUMENT_VERSION);
        assert_eq!(raw["fields"]["legacy_flag"], 42);
        assert_eq!(raw["fields"]["display_name"], "Alice");
    }

    #[test]
    fn test_newer_layout_is_refused() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().to_path_buf());
        fs::write(
            temp_dir.path().join(GLOBALS_FILE),
            r#"{"version":99,"fields":{}}"#,
        )
        .unwrap();

        let err = store
            .get(&StorageKey::global(GlobalKey::DisplayName))
            .unwrap_err();
        assert!(matches!(err, ThanklyError::DataAccess(_)));
    }

    #[test]
    fn test_corrupt_partition_reads_as_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().to_path_buf());
        let alice = id("alice-1");
        fs::create_dir_all(temp_dir.path().join(PARTITIONS_DIR)).unwrap();
        fs::write(
            temp_dir.path().join(PARTITIONS_DIR).join("alice-1.json"),
            "garbage",
        )
        .unwrap();

        let key = StorageKey::partition(&alice, PartitionField::Appreciations);
        assert!(store.get(&key).unwrap_err().is_serialization());
        let lenient: Option<Value> = store.get_lenient(&key).unwrap();
        assert!(lenient.is_none());
    }
}
