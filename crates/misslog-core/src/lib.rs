//! misslog-core: miss log store, snapshot codec, and weak-tag statistics.
//!
//! This crate defines the entry data model, the sorted store that owns it,
//! and the persistence slot abstraction the store writes through.

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod snapshot;
pub mod stats;
pub mod storage;
pub mod store;
pub mod traits;

pub use error::{ImportError, StorageError, StoreError, ValidationError};
pub use filter::FilterCriteria;
pub use model::{EntryDraft, EntryId, MissEntry, WhyMissed};
pub use stats::{ReasonCount, TagCount};
pub use storage::{FileSlotStorage, MemorySlotStorage};
pub use store::{ImportSummary, MissLogStore};
pub use traits::SlotStorage;
