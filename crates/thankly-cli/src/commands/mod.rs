//! Command implementations.

pub mod entry;
pub mod journal;
pub mod profile;

use anyhow::{Context, Result, bail};
use std::path::Path;
use std::sync::Arc;
use thankly_application::{JournalApp, JournalPage, PageOutcome};
use thankly_core::SessionContext;
use thankly_core::config::ThanklyConfig;
use thankly_infrastructure::{ConfigService, FileKeyValueStore, ThanklyPaths, directory_client};

/// Everything a command needs: resolved paths, config and the app.
pub struct Env {
    pub paths: ThanklyPaths,
    pub config: ThanklyConfig,
    pub store: Arc<FileKeyValueStore>,
    pub app: JournalApp,
}

/// Resolves paths and loads (or creates) the config.
///
/// Runs before logging is installed, so failures go straight to the caller.
pub fn load_settings(home: Option<&Path>) -> Result<(ThanklyPaths, ThanklyConfig)> {
    let paths = ThanklyPaths::from_override(home)?;
    paths.ensure_dirs()?;

    let config = ConfigService::new(paths.config_file())
        .get_config()
        .context("Failed to load config.toml")?;
    Ok((paths, config))
}

impl Env {
    pub fn new(paths: ThanklyPaths, config: ThanklyConfig) -> Self {
        let store = Arc::new(FileKeyValueStore::new(paths.data_dir().to_path_buf()));
        let ctx = SessionContext::with_store(store.clone());
        let app = JournalApp::new(ctx, config.clone(), directory_client(&config.directory));

        Self {
            paths,
            config,
            store,
            app,
        }
    }

    /// Opens the page for `fragment`, or explains how to get one.
    pub fn open_page(&self, fragment: Option<&str>) -> Result<JournalPage> {
        match self.app.open_page(fragment)? {
            PageOutcome::Opened(page) => Ok(*page),
            PageOutcome::EntryFlowRequired => bail!(
                "No journal selected. Start one with `thankly signup --name <name>` \
                 or continue with `thankly login <identifier>`."
            ),
        }
    }
}
