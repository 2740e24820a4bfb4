pub mod add;
pub mod clear;
pub mod delete;
pub mod edit;
pub mod init;
pub mod list;
pub mod review;
pub mod transfer;

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use misslog_core::config::{load_config_from, MisslogConfig};
use misslog_core::model::parse_date;
use misslog_core::{EntryDraft, FileSlotStorage, MissLogStore, WhyMissed};

/// Resolved configuration shared by every command that touches the log.
pub struct Context {
    pub config: MisslogConfig,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = load_config_from(config_path.as_deref())?;
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        tracing::debug!(data_dir = %config.data_dir.display(), "config loaded");
        Ok(Self { config })
    }

    pub fn open_store(&self) -> MissLogStore<FileSlotStorage> {
        MissLogStore::open(FileSlotStorage::new(&self.config.data_dir))
    }
}

/// Entry fields as given on the command line; `None` leaves the draft value.
pub struct EntryFields {
    pub topic: Option<String>,
    pub concept: Option<String>,
    pub rule: Option<String>,
    pub date: Option<String>,
    pub why: Option<String>,
    pub why_notes: Option<String>,
    pub tags: Option<String>,
}

impl EntryFields {
    pub fn apply(self, mut draft: EntryDraft) -> Result<EntryDraft> {
        if let Some(topic) = self.topic {
            draft.topic = topic;
        }
        if let Some(concept) = self.concept {
            draft.concept = concept;
        }
        if let Some(rule) = self.rule {
            draft.rule = rule;
        }
        if let Some(date) = self.date {
            draft.created_at = Some(parse_date(&date).map_err(|e| anyhow!(e))?);
        }
        if let Some(why) = self.why {
            draft.why_missed = parse_why(&why)?;
        }
        if let Some(notes) = self.why_notes {
            draft.why_notes = notes;
        }
        match self.tags {
            Some(tags) => Ok(draft.with_tags_text(&tags)),
            None => Ok(draft),
        }
    }
}

pub fn parse_why(value: &str) -> Result<WhyMissed> {
    value.parse::<WhyMissed>().map_err(|e| anyhow!(e))
}
