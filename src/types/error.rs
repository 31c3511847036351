//! Error types for treesync

use super::EntryKind;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for sync operations
///
/// Every filesystem failure carries the path it happened on. All of them are
/// fatal for the directory being reconciled.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Standard IO error not tied to a sync step
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Directory could not be listed or an entry could not be inspected
    #[error("Failed to list {}: {source}", .path.display())]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Destination directory could not be created
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File could not be opened, created, streamed or chmod'ed
    #[error("Failed to copy {}: {source}", .path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Timestamps could not be applied after the content was written
    #[error("Failed to set timestamps on {}: {source}", .path.display())]
    Timestamp {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File content could not be read for change detection
    #[error("Failed to hash {}: {source}", .path.display())]
    Hash {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Orphaned destination entry could not be removed
    #[error("Failed to delete {}: {source}", .path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Same name is a file on one side and a directory on the other
    #[error(
        "Kind conflict at {}: source is a {source_kind}, destination is a {dest_kind}",
        .path.display()
    )]
    KindConflict {
        path: PathBuf,
        source_kind: EntryKind,
        dest_kind: EntryKind,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error (logic checks)
    #[error("Validation error: {0}")]
    Validation(String),
}

impl SyncError {
    /// Check if this error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, SyncError::Validation(_) | SyncError::Config(_))
    }
}
