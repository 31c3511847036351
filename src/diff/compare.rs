//! File comparison logic

use crate::hash::compute_hash;
use crate::types::{DirEntry, SyncError};
use std::path::Path;

/// Result of comparing a source file with its destination counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeVerdict {
    /// No destination file
    Missing,

    /// Sizes differ, content never read
    SizeDiffers,

    /// Same size, different content hash
    ContentDiffers,

    /// Same size and same content hash
    Unchanged,
}

impl ChangeVerdict {
    /// Whether the destination has to be (re)written
    pub fn needs_copy(self) -> bool {
        !matches!(self, ChangeVerdict::Unchanged)
    }

    /// Human-readable reason used in log lines
    pub fn reason(self) -> &'static str {
        match self {
            ChangeVerdict::Missing => "destination missing",
            ChangeVerdict::SizeDiffers => "source file size is different",
            ChangeVerdict::ContentDiffers => "hash does not match",
            ChangeVerdict::Unchanged => "identical",
        }
    }
}

/// Compare a source file against a (possibly absent) destination file
///
/// 1. **Missing**: no destination entry → copy
/// 2. **Size mismatch**: conclusive, no content is read → copy
/// 3. **Same size**: hash both files in full and compare
///
/// Only the third tier touches file content, so large unchanged files are read
/// twice and everything else is decided from metadata alone.
///
/// # Errors
/// A failure to open or read either file is returned as [`SyncError::Hash`].
/// It never degrades into a "copy" or "skip" decision.
pub fn detect_change(
    src_path: &Path,
    src: &DirEntry,
    dest_path: &Path,
    dest: Option<&DirEntry>,
) -> Result<ChangeVerdict, SyncError> {
    let Some(dest) = dest else {
        return Ok(ChangeVerdict::Missing);
    };

    if src.size != dest.size {
        return Ok(ChangeVerdict::SizeDiffers);
    }

    let src_hash = compute_hash(src_path)?;
    let dest_hash = compute_hash(dest_path)?;

    if src_hash == dest_hash {
        Ok(ChangeVerdict::Unchanged)
    } else {
        Ok(ChangeVerdict::ContentDiffers)
    }
}

/// Boolean shorthand for [`detect_change`]
pub fn needs_copy(
    src_path: &Path,
    src: &DirEntry,
    dest_path: &Path,
    dest: Option<&DirEntry>,
) -> Result<bool, SyncError> {
    detect_change(src_path, src, dest_path, dest).map(ChangeVerdict::needs_copy)
}
