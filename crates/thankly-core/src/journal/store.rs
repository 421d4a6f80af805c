//! Journal store: dated entries of one identifier.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use super::model::{Appreciation, EntryContent};
use crate::context::SessionContext;
use crate::error::{Result, ThanklyError};
use crate::identity::{Identifier, IdentityRecord, ViewState};
use crate::storage::{KeyValueStoreExt, PartitionField, StorageKey};
use crate::tier::AccountTier;

/// Snapshot written by [`JournalStore::export`].
#[derive(Debug, Clone, Serialize)]
pub struct JournalExport<'a> {
    pub identifier: &'a Identifier,
    pub exported_at: DateTime<Utc>,
    pub appreciations: &'a [Appreciation],
}

/// CRUD over the entries of the viewed journal.
///
/// Entries are kept newest-first and the whole list is written back after
/// every mutation. Mutations are refused outright when the view is
/// read-only; the partition is keyed by nothing but the identifier string,
/// so this check is the only thing keeping a viewer out of it.
#[derive(Debug)]
pub struct JournalStore {
    ctx: SessionContext,
    view: ViewState,
    tier: AccountTier,
    entries: Vec<Appreciation>,
}

impl JournalStore {
    /// Loads the target's entries.
    ///
    /// Missing or unreadable data yields an empty journal. This keeps the
    /// page usable but also hides corruption; the warning is the only trace.
    ///
    /// `view.read_only` is re-derived from the stored original identifier, so
    /// a hand-built view cannot unlock someone else's partition.
    pub fn open(ctx: SessionContext, view: ViewState, tier: AccountTier) -> Result<Self> {
        let claimed = view.read_only;
        let view = view.confirmed(&IdentityRecord::load(ctx.store())?);
        if view.read_only && !claimed {
            warn!(
                "View of {} by {} does not match the stored owner; opening read-only",
                view.target, view.viewer
            );
        }

        let key = StorageKey::partition(&view.target, PartitionField::Appreciations);
        let entries: Vec<Appreciation> = match ctx.store().get_lenient(&key)? {
            Some(entries) => entries,
            None => {
                debug!("No appreciations stored for {}", view.target);
                Vec::new()
            }
        };

        debug!(
            "Opened journal {} with {} entries (read_only: {})",
            view.target,
            entries.len(),
            view.read_only
        );

        Ok(Self {
            ctx,
            view,
            tier,
            entries,
        })
    }

    pub fn identifier(&self) -> &Identifier {
        &self.view.target
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn is_read_only(&self) -> bool {
        self.view.read_only
    }

    pub fn tier(&self) -> AccountTier {
        self.tier
    }

    /// The day quotas are counted against.
    pub fn today(&self) -> NaiveDate {
        self.ctx.clock().today()
    }

    /// All entries, newest first.
    pub fn list(&self) -> &[Appreciation] {
        &self.entries
    }

    pub fn get(&self, id: i64) -> Option<&Appreciation> {
        self.entries.iter().find(|a| a.id == id)
    }

    /// Files a new entry under `date`.
    ///
    /// The daily quota counts entries dated *today*, whatever `date` is, so a
    /// full today blocks back-filling other days as well.
    pub fn add(
        &mut self,
        date: Option<NaiveDate>,
        title: Option<&str>,
        text: &str,
    ) -> Result<Appreciation> {
        self.ensure_writable()?;
        let date = date.ok_or(ThanklyError::MissingDate)?;
        let content = EntryContent::validate(title, text)?;

        let today = self.ctx.clock().today();
        let written_today = self.count_for_date(today);
        let limits = self.tier.limits();
        if !limits.allows_another(written_today) {
            let limit = limits.max_appreciations_per_day.unwrap_or(written_today);
            info!(
                "Rejected appreciation for {}: {} already written on {}",
                self.view.target, written_today, today
            );
            return Err(ThanklyError::QuotaExceeded { limit });
        }

        let entry = Appreciation {
            id: self.next_id()?,
            title: content.title,
            text: content.text,
            date,
        };

        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.push(entry.clone());
        next.extend(self.entries.iter().cloned());
        self.commit(next)?;

        info!("Added appreciation {} on {} to {}", entry.id, date, self.view.target);
        Ok(entry)
    }

    /// Replaces title and/or text of an entry.
    ///
    /// `None` keeps a field; an empty title clears it. The result must still
    /// be non-blank.
    pub fn update(
        &mut self,
        id: i64,
        title: Option<&str>,
        text: Option<&str>,
    ) -> Result<Appreciation> {
        self.ensure_writable()?;
        let position = self
            .entries
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| ThanklyError::not_found("appreciation", id.to_string()))?;

        let current = &self.entries[position];
        let title = match title {
            Some(title) => Some(title),
            None => current.title.as_deref(),
        };
        let text = text.unwrap_or(&current.text);
        let content = EntryContent::validate(title, text)?;

        let mut next = self.entries.clone();
        next[position].title = content.title;
        next[position].text = content.text;
        let updated = next[position].clone();
        self.commit(next)?;

        info!("Updated appreciation {} in {}", id, self.view.target);
        Ok(updated)
    }

    /// Deletes an entry; an unknown id is a no-op.
    pub fn remove(&mut self, id: i64) -> Result<()> {
        self.ensure_writable()?;
        if self.get(id).is_none() {
            debug!("Appreciation {} already absent from {}", id, self.view.target);
            return Ok(());
        }

        let next: Vec<Appreciation> = self.entries.iter().filter(|a| a.id != id).cloned().collect();
        self.commit(next)?;

        info!("Removed appreciation {} from {}", id, self.view.target);
        Ok(())
    }

    pub fn count_for_date(&self, date: NaiveDate) -> usize {
        self.entries.iter().filter(|a| a.date == date).count()
    }

    /// Number of distinct days with at least one entry ("days written").
    pub fn count_distinct_dates_with_entries(&self) -> usize {
        self.entries
            .iter()
            .map(|a| a.date)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Entries of one day, newest first.
    pub fn entries_for_date(&self, date: NaiveDate) -> Vec<&Appreciation> {
        self.entries.iter().filter(|a| a.date == date).collect()
    }

    /// Case-insensitive search over titles and texts.
    pub fn search_entries(&self, term: &str) -> Vec<&Appreciation> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries.iter().filter(|a| a.matches(&needle)).collect()
    }

    /// The persisted "total days written" counter, if any.
    pub fn stored_total_days(&self) -> Result<Option<usize>> {
        self.ctx.store().get_lenient(&StorageKey::partition(
            &self.view.target,
            PartitionField::TotalDays,
        ))
    }

    /// Serializes every entry for download.
    pub fn export(&self) -> Result<String> {
        if !self.tier.limits().can_export {
            return Err(ThanklyError::FeatureUnavailable {
                feature: "export",
                tier: self.tier.to_string(),
            });
        }
        let document = JournalExport {
            identifier: &self.view.target,
            exported_at: self.ctx.clock().now(),
            appreciations: &self.entries,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.view.read_only {
            warn!(
                "Refused mutation of {} by viewer {}",
                self.view.target, self.view.viewer
            );
            return Err(ThanklyError::read_only(self.view.target.as_str()));
        }
        Ok(())
    }

    /// Millisecond timestamp, nudged past the largest existing id.
    fn next_id(&self) -> Result<i64> {
        let now = self.ctx.clock().now().timestamp_millis();
        match self.entries.iter().map(|a| a.id).max() {
            Some(max) if max >= now => max.checked_add(1).ok_or_else(|| {
                ThanklyError::internal(format!(
                    "appreciation ids of {} are exhausted",
                    self.view.target
                ))
            }),
            _ => Ok(now),
        }
    }

    /// Persists `next` and only then swaps it in, so a failed write leaves the
    /// in-memory list unchanged.
    ///
    /// The days-written counter is derived data: once the entries are stored
    /// a failure to refresh it is logged, not returned.
    fn commit(&mut self, next: Vec<Appreciation>) -> Result<()> {
        let store = self.ctx.store();
        store.set_as(
            &StorageKey::partition(&self.view.target, PartitionField::Appreciations),
            &next,
        )?;
        self.entries = next;
        if let Err(e) = store.set_as(
            &StorageKey::partition(&self.view.target, PartitionField::TotalDays),
            &self.count_distinct_dates_with_entries(),
        ) {
            warn!(
                "Failed to refresh days written for {}: {}",
                self.view.target, e
            );
        }
        Ok(())
    }
}
