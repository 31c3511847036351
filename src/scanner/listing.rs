//! Single-directory listing and the per-directory destination index

use crate::types::{DirEntry, SyncError};
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// List the immediate children of a source directory
///
/// Symlinks are followed, so a link to a file is listed as a file and a link
/// to a directory as a directory. Special files (pipes, sockets, devices) are
/// skipped with a warning. Entries come back sorted by name so a pass over the
/// same tree always visits entries in the same order.
///
/// # Errors
/// Failing to open the directory, read an entry, or stat a child returns
/// [`SyncError::List`] naming the path that failed.
pub fn list_dir(path: &Path) -> Result<Vec<DirEntry>, SyncError> {
    let mut entries = Vec::new();

    for (name, child) in children(path)? {
        let metadata = fs::metadata(&child).map_err(list_error(&child))?;

        if !metadata.is_dir() && !metadata.is_file() {
            warn!("Skipping special file {}", child.display());
            continue;
        }

        entries.push(DirEntry::from_metadata(name, &metadata).map_err(list_error(&child))?);
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// List the immediate children of a destination directory as they are on disk
///
/// Nothing is followed or skipped: symlinks (dangling ones included) and
/// special files are kept with their own [`EntryKind`] so they can be pruned
/// or reported as conflicts.
///
/// [`EntryKind`]: crate::types::EntryKind
pub fn list_dir_raw(path: &Path) -> Result<Vec<DirEntry>, SyncError> {
    let mut entries = Vec::new();

    for (name, child) in children(path)? {
        let metadata = fs::symlink_metadata(&child).map_err(list_error(&child))?;
        entries.push(DirEntry::from_metadata(name, &metadata).map_err(list_error(&child))?);
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn children(path: &Path) -> Result<Vec<(OsString, PathBuf)>, SyncError> {
    let mut children = Vec::new();
    for item in fs::read_dir(path).map_err(list_error(path))? {
        let item = item.map_err(list_error(path))?;
        children.push((item.file_name(), item.path()));
    }
    Ok(children)
}

/// Destination entries of one directory, keyed by name
///
/// Source entries are matched against it with [`DestinationIndex::take`].
/// Whatever is left once every source entry has been matched is an orphan.
#[derive(Debug, Clone, Default)]
pub struct DestinationIndex {
    entries: HashMap<OsString, DirEntry>,
}

impl DestinationIndex {
    /// Create an empty index (destination directory did not exist)
    pub fn new() -> Self {
        Self::default()
    }

    /// List a destination directory and index its entries
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        Ok(Self::from_entries(list_dir_raw(path)?))
    }

    /// Index already listed entries
    pub fn from_entries(entries: impl IntoIterator<Item = DirEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.name.clone(), entry))
                .collect(),
        }
    }

    /// Remove and return a matched entry
    pub fn take(&mut self, name: &OsStr) -> Option<DirEntry> {
        self.entries.remove(name)
    }

    /// Consume the index, returning unmatched entries sorted by name
    pub fn into_orphans(self) -> Vec<DirEntry> {
        let mut orphans: Vec<DirEntry> = self.entries.into_values().collect();
        orphans.sort_by(|a, b| a.name.cmp(&b.name));
        orphans
    }
}

fn list_error(path: &Path) -> impl FnOnce(io::Error) -> SyncError {
    let path = path.to_path_buf();
    move |source| SyncError::List { path, source }
}
