//! Executor module for destination mutations
//!
//! Every function here touches the destination tree and maps failures onto
//! the matching [`SyncError`] variant.

pub mod copy;

pub use copy::copy_file;

use crate::types::{DirEntry, SyncError};
use filetime::FileTime;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Create `path` as a directory carrying the mode and mtime of `source`
///
/// The parent must already exist.
pub fn create_dir_from(path: &Path, source: &DirEntry) -> Result<(), SyncError> {
    let create_error = |source| SyncError::CreateDir {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir(path).map_err(create_error)?;
    set_dir_mode(path, source.permissions).map_err(create_error)?;
    apply_mtime(path, source.mtime)
}

/// Set both atime and mtime of `path` to `mtime`
pub fn apply_mtime(path: &Path, mtime: SystemTime) -> Result<(), SyncError> {
    let mtime = FileTime::from_system_time(mtime);
    filetime::set_file_times(path, mtime, mtime).map_err(|source| SyncError::Timestamp {
        path: path.to_path_buf(),
        source,
    })
}

/// Remove a file, symlink or whole directory tree
///
/// The on-disk type is checked without following symlinks, so a link to a
/// directory removes the link and never the tree behind it.
pub fn remove_entry(path: &Path) -> Result<(), SyncError> {
    let delete_error = |source| SyncError::Delete {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::symlink_metadata(path).map_err(delete_error)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path).map_err(delete_error)
    } else {
        fs::remove_file(path).map_err(delete_error)
    }
}

#[cfg(unix)]
fn set_dir_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_dir_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}
