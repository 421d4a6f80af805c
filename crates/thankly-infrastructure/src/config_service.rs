//! Configuration service.
//!
//! Loads `config.toml`, writing the defaults on first run, and caches the
//! result.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use thankly_core::Result;
use thankly_core::config::ThanklyConfig;
use tracing::{debug, info};

use crate::storage::AtomicFile;

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<ThanklyConfig>>>,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// The configuration, loaded on first access.
    ///
    /// A missing file is created with the defaults. A file that does not
    /// parse is an error rather than silently replaced.
    pub fn get_config(&self) -> Result<ThanklyConfig> {
        {
            let cached = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load_or_create()?;

        let mut cache = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cache = Some(loaded.clone());
        Ok(loaded)
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cache = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cache = None;
    }

    fn load_or_create(&self) -> Result<ThanklyConfig> {
        let file = AtomicFile::<ThanklyConfig>::new(self.path.clone());
        match file.load()? {
            Some(config) => {
                debug!("Loaded configuration from {}", self.path.display());
                Ok(config)
            }
            None => {
                let config = ThanklyConfig::default();
                file.save(&config)?;
                info!("Wrote default configuration to {}", self.path.display());
                Ok(config)
            }
        }
    }
}
