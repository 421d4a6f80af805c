//! Atomic file operations for JSON and TOML documents.
//!
//! Writes go to a sibling temp file which is fsynced and renamed over the
//! target, so readers see either the old or the new document. Read-modify-
//! write cycles are serialized with an `fs2` lock file.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thankly_core::ThanklyError;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during atomic file operations.
#[derive(Debug, Error)]
pub enum AtomicFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl AtomicFileError {
    /// True when the file exists but its content does not decode.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            AtomicFileError::Json(e) if !e.is_io()
        ) || matches!(self, AtomicFileError::TomlDe(_))
    }
}

impl From<AtomicFileError> for ThanklyError {
    fn from(err: AtomicFileError) -> Self {
        match err {
            AtomicFileError::Io(e) => ThanklyError::from(e),
            AtomicFileError::Json(e) => ThanklyError::from(e),
            AtomicFileError::TomlDe(e) => ThanklyError::from(e),
            AtomicFileError::TomlSer(e) => ThanklyError::from(e),
            AtomicFileError::Lock(message) => ThanklyError::data_access(message),
            AtomicFileError::InvalidPath(message) => ThanklyError::io(message),
        }
    }
}

/// On-disk encoding of an [`AtomicFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    /// `.toml` files are TOML, everything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => FileFormat::Toml,
            _ => FileFormat::Json,
        }
    }

    fn encode<T: Serialize>(self, data: &T) -> Result<String, AtomicFileError> {
        Ok(match self {
            FileFormat::Json => serde_json::to_string_pretty(data)?,
            FileFormat::Toml => toml::to_string_pretty(data)?,
        })
    }

    fn decode<T: DeserializeOwned>(self, content: &str) -> Result<T, AtomicFileError> {
        Ok(match self {
            FileFormat::Json => serde_json::from_str(content)?,
            FileFormat::Toml => toml::from_str(content)?,
        })
    }
}

/// A handle to one document on disk.
#[derive(Debug, Clone)]
pub struct AtomicFile<T> {
    path: PathBuf,
    format: FileFormat,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> AtomicFile<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Format is picked from the extension.
    pub fn new(path: PathBuf) -> Self {
        let format = FileFormat::from_path(&path);
        Self::with_format(path, format)
    }

    pub fn with_format(path: PathBuf, format: FileFormat) -> Self {
        Self {
            path,
            format,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the document. A missing or empty file is `None`.
    pub fn load(&self) -> Result<Option<T>, AtomicFileError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        self.format.decode(&content).map(Some)
    }

    /// Writes the document via temp file, fsync and rename.
    pub fn save(&self, data: &T) -> Result<(), AtomicFileError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let encoded = self.format.encode(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(encoded.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Locked read-modify-write.
    ///
    /// A missing file starts from `T::default()`. A file that no longer
    /// decodes is moved aside to `<name>.corrupt` and also replaced by the
    /// default, so one bad write cannot block every later one.
    pub fn update<F, R>(&self, f: F) -> Result<R, AtomicFileError>
    where
        T: Default,
        F: FnOnce(&mut T) -> R,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = match self.load() {
            Ok(data) => data.unwrap_or_default(),
            Err(e) if e.is_decode() => {
                self.quarantine(&e)?;
                T::default()
            }
            Err(e) => return Err(e),
        };

        let result = f(&mut data);
        self.save(&data)?;
        Ok(result)
    }

    fn quarantine(&self, cause: &AtomicFileError) -> Result<(), AtomicFileError> {
        let mut aside = self.path.clone().into_os_string();
        aside.push(".corrupt");
        warn!(
            "Unreadable document {} ({}); moving it to {:?}",
            self.path.display(),
            cause,
            aside
        );
        fs::rename(&self.path, PathBuf::from(aside))?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicFileError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| AtomicFileError::InvalidPath(self.path.display().to_string()))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| AtomicFileError::InvalidPath(self.path.display().to_string()))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock held for the duration of an update.
///
/// The lock file itself is left in place; removing it on release would let
/// a waiter lock an unlinked inode.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicFileError> {
        let mut lock_path = path.to_path_buf().into_os_string();
        lock_path.push(".lock");
        let lock_path = PathBuf::from(lock_path);

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        use fs2::FileExt;
        file.lock_exclusive().map_err(|e| {
            AtomicFileError::Lock(format!("Failed to lock {}: {}", lock_path.display(), e))
        })?;

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        use fs2::FileExt;
        let _ = self.file.unlock();
    }
}
