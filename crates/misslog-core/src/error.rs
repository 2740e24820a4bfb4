//! Error types for the miss log store.
//!
//! Store operations never panic on well-formed calls; every failure is
//! surfaced as one of these variants so callers can decide how to report it.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::EntryId;

/// A draft failed the required-field checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was empty after trimming.
    #[error("{0} is required and cannot be empty")]
    EmptyField(&'static str),
}

/// An import payload could not be applied.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The payload is not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The top-level JSON value is not an array.
    #[error("expected a JSON array of entries, found {0}")]
    NotAnArray(&'static str),

    /// An array element is not an object.
    #[error("element {index} is {kind}, not an entry object")]
    NotARecord { index: usize, kind: &'static str },
}

/// The persistence slot could not be read or written.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors returned by `MissLogStore` operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("entry not found: {0}")]
    NotFound(EntryId),

    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to serialize entries: {0}")]
    Serialize(#[source] serde_json::Error),
}
