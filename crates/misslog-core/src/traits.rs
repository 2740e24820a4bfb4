//! Core trait definitions for persistence.
//!
//! The store never touches the filesystem directly; it talks to a
//! `SlotStorage`, which `storage` implements for files and for memory.

use crate::error::StorageError;

/// A durable key-value slot holding one serialized snapshot per key.
pub trait SlotStorage {
    /// Human-readable backend name (e.g. "file").
    fn name(&self) -> &str;

    /// Read the value stored under `key`, or `None` if nothing was saved.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}
