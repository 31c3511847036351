//! DirEntry - One filesystem object seen while listing a directory

use std::ffi::OsString;
use std::fmt;
use std::fs::Metadata;
use std::time::SystemTime;

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file (source symlinks resolve to their target)
    File,

    /// Directory
    Directory,

    /// Symlink left unresolved (destination listings only)
    Symlink,

    /// Pipe, socket or device node
    Special,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => f.write_str("file"),
            EntryKind::Directory => f.write_str("directory"),
            EntryKind::Symlink => f.write_str("symlink"),
            EntryKind::Special => f.write_str("special file"),
        }
    }
}

/// Snapshot of a file or directory inside a listed directory
///
/// The snapshot is taken once and never refreshed, so it may be stale by the
/// time it is acted upon.
#[derive(Debug, Clone, PartialEq)]
pub struct DirEntry {
    /// Name within the parent directory
    pub name: OsString,

    /// What the entry is on disk
    pub kind: EntryKind,

    /// Size in bytes (0 for directories)
    pub size: u64,

    /// Last modification time
    pub mtime: SystemTime,

    /// Unix permissions (mode bits)
    pub permissions: u32,
}

impl DirEntry {
    /// Create a new file entry
    pub fn file(name: impl Into<OsString>, size: u64, mtime: SystemTime, permissions: u32) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            size,
            mtime,
            permissions,
        }
    }

    /// Create a new directory entry
    pub fn directory(name: impl Into<OsString>, mtime: SystemTime, permissions: u32) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
            size: 0,
            mtime,
            permissions,
        }
    }

    /// Build an entry from already fetched metadata
    ///
    /// Metadata from `symlink_metadata` keeps links as [`EntryKind::Symlink`].
    pub fn from_metadata(name: impl Into<OsString>, metadata: &Metadata) -> std::io::Result<Self> {
        let mtime = metadata.modified()?;
        let permissions = mode_of(metadata);
        let file_type = metadata.file_type();

        let mut entry = if file_type.is_dir() {
            Self::directory(name, mtime, permissions)
        } else {
            Self::file(name, metadata.len(), mtime, permissions)
        };

        if file_type.is_symlink() {
            entry.kind = EntryKind::Symlink;
        } else if !file_type.is_dir() && !file_type.is_file() {
            entry.kind = EntryKind::Special;
        }

        Ok(entry)
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

#[cfg(unix)]
fn mode_of(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn mode_of(metadata: &Metadata) -> u32 {
    if metadata.is_dir() {
        0o755
    } else if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}
