//! Exclude patterns

use crate::types::SyncError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::ffi::OsStr;
use std::path::Path;

/// Compiled `--exclude` globs
///
/// A pattern matches either the bare entry name (`*.tmp`, `.git`) or the path
/// relative to the source root (`build/cache`, `logs/**`).
#[derive(Debug, Clone)]
pub struct ExcludeFilter {
    set: GlobSet,
}

impl ExcludeFilter {
    /// Compile patterns; an empty list excludes nothing
    pub fn new(patterns: &[String]) -> Result<Self, SyncError> {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                SyncError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }

        let set = builder
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to build exclude set: {}", e)))?;

        Ok(Self { set })
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Whether an entry should be left alone
    pub fn is_excluded(&self, name: &OsStr, root_relative: &Path) -> bool {
        !self.is_empty() && (self.set.is_match(name) || self.set.is_match(root_relative))
    }
}
