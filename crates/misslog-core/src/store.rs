//! The miss log store: the authoritative, always-sorted entry collection
//! mirrored into a `SlotStorage` slot.
//!
//! Mutations are computed on a copy of the collection and only committed
//! once the slot write has succeeded, so the in-memory view never runs ahead
//! of what is on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::filter::{filter_entries, FilterCriteria};
use crate::model::{EntryDraft, EntryId, MissEntry};
use crate::snapshot::{self, CoercionMode, STORAGE_KEY};
use crate::stats::{self, ReasonCount, TagCount};
use crate::traits::SlotStorage;

/// Outcome of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Entries now in the store.
    pub imported: usize,
    /// Records discarded during coercion.
    pub dropped: usize,
}

/// Owns every miss entry and keeps them sorted newest first.
pub struct MissLogStore<S: SlotStorage> {
    storage: S,
    entries: Vec<MissEntry>,
}

impl<S: SlotStorage> MissLogStore<S> {
    /// Hydrate a store from `storage`.
    ///
    /// Never fails: an absent, unreadable or malformed slot yields an empty
    /// collection, and structurally invalid records are discarded.
    pub fn open(storage: S) -> Self {
        let entries = hydrate(&storage, Utc::now());
        tracing::debug!(
            "opened {} store with {} entries",
            storage.name(),
            entries.len()
        );
        Self { storage, entries }
    }

    /// All entries, newest first.
    pub fn list(&self) -> &[MissEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &EntryId) -> Option<&MissEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Validate `draft`, give it a fresh id, and insert it.
    pub fn add(&mut self, draft: EntryDraft) -> Result<MissEntry, StoreError> {
        let entry = draft.build(EntryId::generate(), Utc::now())?;

        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.push(entry.clone());
        next.extend(self.entries.iter().cloned());
        self.commit(next)?;

        tracing::debug!("added entry {}", entry.id);
        Ok(entry)
    }

    /// Replace the entry with `id` by a record built from `draft`.
    pub fn update(&mut self, id: &EntryId, draft: EntryDraft) -> Result<MissEntry, StoreError> {
        let position = self
            .entries
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let entry = draft.build(id.clone(), Utc::now())?;

        let mut next = self.entries.clone();
        next[position] = entry.clone();
        self.commit(next)?;

        tracing::debug!("updated entry {id}");
        Ok(entry)
    }

    /// Remove the entry with `id`. Returns `false` if there was none.
    pub fn delete(&mut self, id: &EntryId) -> Result<bool, StoreError> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let next = self.entries.iter().filter(|e| &e.id != id).cloned().collect();
        self.commit(next)?;

        tracing::debug!("deleted entry {id}");
        Ok(true)
    }

    /// Entries satisfying `criteria`, newest first.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&MissEntry> {
        filter_entries(&self.entries, criteria)
    }

    pub fn topics_in_use(&self) -> Vec<String> {
        stats::topics_in_use(&self.entries)
    }

    pub fn tags_in_use(&self) -> Vec<String> {
        stats::tags_in_use(&self.entries)
    }

    /// Up to `limit` tags ranked by how many entries carry them.
    pub fn weak_tag_ranking(&self, limit: usize) -> Vec<TagCount> {
        stats::weak_tag_ranking(&self.entries, limit)
    }

    pub fn why_missed_breakdown(&self) -> Vec<ReasonCount> {
        stats::why_missed_breakdown(&self.entries)
    }

    /// The whole collection as a pretty-printed JSON array.
    pub fn export_snapshot(&self) -> Result<String, StoreError> {
        snapshot::encode(&self.entries).map_err(StoreError::Serialize)
    }

    /// Replace the whole collection with the records in `raw`.
    ///
    /// A payload that is not a JSON array of objects fails without touching
    /// the store.
    pub fn import_snapshot(&mut self, raw: &str) -> Result<ImportSummary, StoreError> {
        let records = snapshot::parse_array(raw)?;
        snapshot::require_records(&records)?;
        let coerced = snapshot::coerce_records(&records, CoercionMode::Import, Utc::now());
        let summary = ImportSummary {
            imported: coerced.entries.len(),
            dropped: coerced.dropped,
        };
        self.commit(coerced.entries)?;

        tracing::info!(
            "imported {} entries ({} dropped)",
            summary.imported,
            summary.dropped
        );
        Ok(summary)
    }

    /// Remove every entry. Confirming intent is the caller's job.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let removed = self.entries.len();
        self.commit(Vec::new())?;
        tracing::info!("cleared {removed} entries");
        Ok(())
    }

    /// Sort, persist, then swap in `next`.
    fn commit(&mut self, mut next: Vec<MissEntry>) -> Result<(), StoreError> {
        sort_by_recent(&mut next);
        let encoded = snapshot::encode(&next).map_err(StoreError::Serialize)?;
        self.storage.save(STORAGE_KEY, &encoded)?;
        tracing::debug!("persisted {} entries", next.len());
        self.entries = next;
        Ok(())
    }
}

/// Stable sort, newest first; equal timestamps keep their relative order.
pub fn sort_by_recent(entries: &mut [MissEntry]) {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn hydrate<S: SlotStorage>(storage: &S, now: DateTime<Utc>) -> Vec<MissEntry> {
    let raw = match storage.load(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("could not read stored entries, starting empty: {e}");
            return Vec::new();
        }
    };

    let records = match snapshot::parse_array(&raw) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("stored entries are malformed, starting empty: {e}");
            return Vec::new();
        }
    };

    let mut coerced = snapshot::coerce_records(&records, CoercionMode::Hydrate, now);
    if coerced.dropped > 0 {
        tracing::warn!("discarded {} invalid stored entries", coerced.dropped);
    }
    sort_by_recent(&mut coerced.entries);
    coerced.entries
}
