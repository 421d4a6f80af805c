//! Identity session: applies the state machine to durable storage and
//! implements the entry flows (sign-up, log-in, log-out).

use tracing::{debug, info};

use super::identifier::{self, Identifier, IdentifierStyle};
use super::record::IdentityRecord;
use super::state::{self, IdentityState};
use crate::context::SessionContext;
use crate::error::{Result, ThanklyError};
use crate::tier::AccountTier;

#[derive(Debug, Clone)]
pub struct IdentitySession {
    ctx: SessionContext,
    style: IdentifierStyle,
}

impl IdentitySession {
    pub fn new(ctx: SessionContext) -> Self {
        Self::with_style(ctx, IdentifierStyle::default())
    }

    pub fn with_style(ctx: SessionContext, style: IdentifierStyle) -> Self {
        Self { ctx, style }
    }

    pub fn record(&self) -> Result<IdentityRecord> {
        IdentityRecord::load(self.ctx.store())
    }

    /// Runs one page-load transition and persists the resulting flags.
    ///
    /// Recomputed from scratch every time; repeating it with the same input
    /// is harmless.
    pub fn resolve(&self, fragment: Option<&str>) -> Result<IdentityState> {
        let record = self.record()?;
        let resolution = state::resolve(fragment, &record);

        if resolution.record != record {
            resolution.record.save(self.ctx.store())?;
        }

        match &resolution.state {
            IdentityState::Unauthenticated => {
                debug!("No usable identifier; entry flow required");
            }
            IdentityState::Owner { identifier } => {
                info!("Opened own journal {}", identifier);
            }
            IdentityState::ReadOnly { target, return_to } => {
                info!("Viewing {} read-only (own journal: {})", target, return_to);
            }
        }

        Ok(resolution.state)
    }

    /// Starts a new journal from a display name.
    ///
    /// The new identifier becomes both the current and the original one; the
    /// caller navigates to its fragment.
    pub fn sign_up(&self, display_name: &str, tier: AccountTier) -> Result<Identifier> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(ThanklyError::EmptyDisplayName);
        }

        let identifier = identifier::generate_with(
            name,
            self.style,
            self.ctx.clock().now(),
            &mut rand::thread_rng(),
        );

        let mut record = self.record()?;
        record.current = Some(identifier.clone());
        record.original = Some(identifier.clone());
        record.came_from_login = false;
        record.authenticated = true;
        record.tier = Some(tier);
        record.display_name = Some(name.to_string());
        record.save(self.ctx.store())?;

        info!("Signed up {} as {} ({})", name, identifier, tier);
        Ok(identifier)
    }

    /// Logs in with an identifier the user already owns.
    ///
    /// The next resolution adopts it as the viewer's own, even if another
    /// original identifier is stored.
    pub fn log_in(&self, raw_identifier: &str) -> Result<Identifier> {
        let identifier = Identifier::parse(raw_identifier)?;

        let mut record = self.record()?;
        record.current = Some(identifier.clone());
        record.came_from_login = true;
        record.authenticated = true;
        record.tier.get_or_insert(AccountTier::Guest);
        record.save(self.ctx.store())?;

        info!("Logged in with existing identifier {}", identifier);
        Ok(identifier)
    }

    /// Drops the authentication flags; journals and the original identifier
    /// stay on disk.
    pub fn log_out(&self) -> Result<()> {
        let mut record = self.record()?;
        record.current = None;
        record.came_from_login = false;
        record.authenticated = false;
        record.tier = None;
        record.save(self.ctx.store())?;
        info!("Logged out");
        Ok(())
    }

    pub fn tier(&self) -> Result<AccountTier> {
        Ok(self.record()?.effective_tier())
    }

    /// `<base>#<own identifier>`
    pub fn share_link(&self, base_url: &str) -> Result<String> {
        let original = self
            .record()?
            .original
            .ok_or_else(|| ThanklyError::not_found("identifier", "original"))?;
        Ok(format!("{}{}", base_url, original.to_fragment()))
    }
}
