//! Journal use cases.
//!
//! `JournalApp` is what a front end talks to: the entry flows, opening a
//! page for a fragment, and the owner-only actions on that page. It keeps
//! the directory strictly advisory: publishing is spawned and search
//! failures already come back as empty results.

use std::sync::Arc;
use thankly_core::config::ThanklyConfig;
use thankly_core::directory::DirectoryClient;
use thankly_core::identity::{Identifier, IdentitySession, IdentityState, ViewState, state};
use thankly_core::journal::JournalStore;
use thankly_core::profile::{Avatar, Profile, ProfileService};
use thankly_core::{AccountTier, Result, SessionContext, ThanklyError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::directory_sync::DirectorySync;
use crate::user_search::UserSearch;

/// Result of opening the journal page.
#[derive(Debug)]
pub enum PageOutcome {
    /// No usable identifier; send the user to the entry flow.
    EntryFlowRequired,
    Opened(Box<JournalPage>),
}

#[derive(Debug)]
pub struct JournalApp {
    ctx: SessionContext,
    session: IdentitySession,
    config: ThanklyConfig,
    sync: DirectorySync,
}

impl JournalApp {
    pub fn new(
        ctx: SessionContext,
        config: ThanklyConfig,
        directory: Arc<dyn DirectoryClient>,
    ) -> Self {
        let session = IdentitySession::with_style(ctx.clone(), config.identifier.style);
        Self {
            ctx,
            session,
            config,
            sync: DirectorySync::new(directory),
        }
    }

    pub fn config(&self) -> &ThanklyConfig {
        &self.config
    }

    pub fn session(&self) -> &IdentitySession {
        &self.session
    }

    /// Login page guard.
    pub fn should_skip_entry_flow(&self, fragment: Option<&str>) -> bool {
        state::should_skip_entry_flow(fragment)
    }

    pub fn sign_up(&self, display_name: &str, tier: AccountTier) -> Result<Identifier> {
        self.session.sign_up(display_name, tier)
    }

    pub fn log_in(&self, identifier: &str) -> Result<Identifier> {
        self.session.log_in(identifier)
    }

    pub fn log_out(&self) -> Result<()> {
        self.session.log_out()
    }

    /// Resolves the identity for `fragment` and loads the page.
    ///
    /// When the viewer owns the journal, their profile is published to the
    /// directory in the background.
    pub fn open_page(&self, fragment: Option<&str>) -> Result<PageOutcome> {
        let state = self.session.resolve(fragment)?;
        let Some(view) = state.view() else {
            return Ok(PageOutcome::EntryFlowRequired);
        };

        let tier = self.session.tier()?;
        let journal = JournalStore::open(self.ctx.clone(), view.clone(), tier)?;
        let profiles = ProfileService::new(self.ctx.clone(), view.clone());
        let profile = profiles.load_or_create()?;

        let mut page = Box::new(JournalPage {
            state,
            view,
            tier,
            journal,
            profiles,
            profile,
            sync: self.sync.clone(),
            pending_sync: None,
        });
        if !page.view.read_only {
            page.publish();
        }
        Ok(PageOutcome::Opened(page))
    }

    /// `<share base>#<own identifier>`, for tiers that may share.
    pub fn share_link(&self) -> Result<String> {
        let tier = self.session.tier()?;
        if !tier.limits().can_share {
            return Err(ThanklyError::FeatureUnavailable {
                feature: "sharing",
                tier: tier.to_string(),
            });
        }
        self.session.share_link(&self.config.share.base_url)
    }

    /// A search box bound to the configured directory.
    pub fn user_search(&self) -> UserSearch {
        UserSearch::new(Arc::clone(self.sync.client()), self.config.search.clone())
    }
}

/// One opened journal page: the identity, the entries and the profile.
#[derive(Debug)]
pub struct JournalPage {
    state: IdentityState,
    view: ViewState,
    tier: AccountTier,
    journal: JournalStore,
    profiles: ProfileService,
    profile: Profile,
    sync: DirectorySync,
    pending_sync: Option<JoinHandle<()>>,
}

impl JournalPage {
    pub fn state(&self) -> &IdentityState {
        &self.state
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn tier(&self) -> AccountTier {
        self.tier
    }

    pub fn journal(&self) -> &JournalStore {
        &self.journal
    }

    pub fn journal_mut(&mut self) -> &mut JournalStore {
        &mut self.journal
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn set_nickname(&mut self, nickname: &str) -> Result<&Profile> {
        self.profile = self.profiles.set_nickname(nickname)?;
        self.publish();
        Ok(&self.profile)
    }

    pub fn set_avatar(&mut self, avatar: Avatar) -> Result<&Profile> {
        self.profile = self.profiles.set_avatar(avatar)?;
        self.publish();
        Ok(&self.profile)
    }

    pub fn clear_avatar(&mut self) -> Result<&Profile> {
        self.profile = self.profiles.clear_avatar()?;
        self.publish();
        Ok(&self.profile)
    }

    /// Waits for the latest background upsert, if one is running.
    ///
    /// Only useful before the process exits; the page never depends on it.
    pub async fn flush_directory(&mut self) {
        if let Some(handle) = self.pending_sync.take() {
            if let Err(e) = handle.await {
                warn!(
                    "Directory update for {} did not finish: {}",
                    self.profile.identifier, e
                );
            }
        }
    }

    fn publish(&mut self) {
        if let Some(handle) = self.sync.publish(&self.profile) {
            info!(
                "Publishing profile of {} to the {} directory",
                self.profile.identifier,
                self.sync.client().name()
            );
            self.pending_sync = Some(handle);
        }
    }
}
