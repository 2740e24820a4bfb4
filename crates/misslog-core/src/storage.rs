//! `SlotStorage` backends: one JSON file per key, and an in-memory fake.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::StorageError;
use crate::traits::SlotStorage;

/// Stores each slot as `<dir>/<key>.json`.
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the target, so a crash mid-write never leaves a truncated
/// slot behind.
#[derive(Debug, Clone)]
pub struct FileSlotStorage {
    dir: PathBuf,
}

impl FileSlotStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SlotStorage for FileSlotStorage {
    fn name(&self) -> &str {
        "file"
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key);
        let write_err = |source| StorageError::Write {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(write_err)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(value.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        tracing::debug!("wrote slot {} ({} bytes)", path.display(), value.len());
        Ok(())
    }
}

/// In-memory slot storage for tests.
///
/// Clones share the same underlying map, so a test can keep a handle to
/// inspect or seed what the store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStorage {
    slots: Rc<RefCell<HashMap<String, String>>>,
    read_only: Rc<Cell<bool>>,
    save_count: Rc<Cell<u32>>,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage with `value` already stored under `key`.
    pub fn seeded(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.set(key, value);
        storage
    }

    /// Current raw value under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    /// Overwrite the raw value under `key` without counting a save.
    pub fn set(&self, key: &str, value: &str) {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    /// Make subsequent saves fail with a permission error.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> u32 {
        self.save_count.get()
    }
}

impl SlotStorage for MemorySlotStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only.get() {
            return Err(StorageError::Write {
                path: PathBuf::from(format!("memory://{key}")),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "storage is read-only",
                ),
            });
        }
        self.set(key, value);
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}
