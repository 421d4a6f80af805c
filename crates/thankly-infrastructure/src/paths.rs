//! Filesystem locations for config, journal data and logs.
//!
//! ```text
//! ~/.config/thankly/           # config_dir
//! ├── config.toml
//! └── logs/
//!     └── thankly.log.YYYY-MM-DD
//!
//! ~/.local/share/thankly/      # data_dir
//! ├── globals.json
//! └── partitions/
//! ```
//!
//! [`ThanklyPaths::with_root`] puts all three under one directory instead,
//! which is what tests and `--home` use.

use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "thankly";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot determine the platform {0} directory")]
    DirNotFound(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThanklyPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
    logs_dir: PathBuf,
}

impl ThanklyPaths {
    /// Platform defaults from `dirs` (XDG on Linux).
    pub fn resolve() -> Result<Self, PathError> {
        let config_dir = dirs::config_dir()
            .ok_or(PathError::DirNotFound("config"))?
            .join(APP_DIR);
        let data_dir = dirs::data_dir()
            .ok_or(PathError::DirNotFound("data"))?
            .join(APP_DIR);
        let logs_dir = config_dir.join("logs");
        Ok(Self {
            config_dir,
            data_dir,
            logs_dir,
        })
    }

    /// Everything below `root`: `config/`, `data/`, `logs/`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
            logs_dir: root.join("logs"),
        }
    }

    /// `with_root` when a root is given, platform defaults otherwise.
    pub fn from_override(root: Option<&Path>) -> Result<Self, PathError> {
        match root {
            Some(root) => Ok(Self::with_root(root)),
            None => Self::resolve(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [&self.config_dir, &self.data_dir, &self.logs_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}
