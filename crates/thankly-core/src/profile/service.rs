//! Profile access for the journal being viewed.

use tracing::{debug, info};

use super::model::{Avatar, MAX_NICKNAME_CHARS, Profile, default_nickname};
use crate::context::SessionContext;
use crate::error::{Result, ThanklyError};
use crate::identity::{Identifier, IdentityRecord, ViewState};
use crate::storage::{KeyValueStoreExt, PartitionField, StorageKey};

/// Reads and edits the profile fields of the target partition.
///
/// Edits are refused unless the viewer owns the partition.
#[derive(Debug, Clone)]
pub struct ProfileService {
    ctx: SessionContext,
    view: ViewState,
}

impl ProfileService {
    pub fn new(ctx: SessionContext, view: ViewState) -> Self {
        Self { ctx, view }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.view.target
    }

    /// Loads the profile, creating the default nickname on first visit.
    ///
    /// The default is persisted only for the owner; a read-only viewer gets a
    /// throwaway nickname and leaves the partition untouched.
    pub fn load_or_create(&self) -> Result<Profile> {
        let store = self.ctx.store();
        let nickname: Option<String> = store.get_lenient(&self.key(PartitionField::Nickname))?;
        let avatar: Option<Avatar> = store.get_lenient(&self.key(PartitionField::Avatar))?;
        let last_updated = store.get_lenient(&self.key(PartitionField::LastUpdated))?;

        let nickname = match nickname {
            Some(nickname) => nickname,
            None => {
                let generated = default_nickname(&mut rand::thread_rng());
                if self.owns()? {
                    store.set_as(&self.key(PartitionField::Nickname), &generated)?;
                    info!("Created profile {} for {}", generated, self.view.target);
                } else {
                    debug!("No profile stored for {}", self.view.target);
                }
                generated
            }
        };

        Ok(Profile {
            identifier: self.view.target.clone(),
            nickname,
            avatar,
            last_updated,
        })
    }

    pub fn set_nickname(&self, nickname: &str) -> Result<Profile> {
        self.ensure_owner()?;
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(ThanklyError::EmptyNickname);
        }
        if nickname.chars().count() > MAX_NICKNAME_CHARS {
            return Err(ThanklyError::TooLong {
                field: "nickname",
                max: MAX_NICKNAME_CHARS,
            });
        }

        self.ctx
            .store()
            .set_as(&self.key(PartitionField::Nickname), nickname)?;
        self.touch()?;
        info!("Nickname of {} set to {}", self.view.target, nickname);
        self.load_or_create()
    }

    pub fn set_avatar(&self, avatar: Avatar) -> Result<Profile> {
        self.ensure_owner()?;
        self.ctx
            .store()
            .set_as(&self.key(PartitionField::Avatar), &avatar)?;
        self.touch()?;
        info!("Avatar of {} updated", self.view.target);
        self.load_or_create()
    }

    pub fn clear_avatar(&self) -> Result<Profile> {
        self.ensure_owner()?;
        self.ctx.store().remove(&self.key(PartitionField::Avatar))?;
        self.touch()?;
        self.load_or_create()
    }

    fn touch(&self) -> Result<()> {
        let now = self.ctx.clock().now();
        self.ctx
            .store()
            .set_as(&self.key(PartitionField::LastUpdated), &now)
    }

    /// Ownership as confirmed by the stored original identifier.
    fn owns(&self) -> Result<bool> {
        let record = IdentityRecord::load(self.ctx.store())?;
        Ok(!self.view.clone().confirmed(&record).read_only)
    }

    fn ensure_owner(&self) -> Result<()> {
        if !self.owns()? {
            return Err(ThanklyError::read_only(self.view.target.as_str()));
        }
        Ok(())
    }

    fn key(&self, field: PartitionField) -> StorageKey {
        StorageKey::partition(&self.view.target, field)
    }
}
