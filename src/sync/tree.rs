//! Recursive reconciliation of one source directory into the destination

use super::ExcludeFilter;
use crate::config::{source_name, Config};
use crate::diff::detect_change;
use crate::executor::{apply_mtime, copy_file, create_dir_from, remove_entry};
use crate::scanner::{list_dir, DestinationIndex};
use crate::types::{DirEntry, EntryKind, EntryOutcome, SyncError, SyncStats};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Walks source directories and brings the destination in line with them
///
/// Settings are fixed at construction. The only state carried between calls
/// is the running [`SyncStats`].
#[derive(Debug)]
pub struct TreeSynchronizer {
    destination_root: PathBuf,
    mirror: bool,
    dry_run: bool,
    excludes: ExcludeFilter,
    stats: SyncStats,
}

impl TreeSynchronizer {
    pub fn new(config: &Config) -> Result<Self, SyncError> {
        Ok(Self {
            destination_root: config.destination.clone(),
            mirror: config.mirror,
            dry_run: config.dry_run,
            excludes: ExcludeFilter::new(&config.exclude_patterns)?,
            stats: SyncStats::default(),
        })
    }

    /// Totals accumulated since construction (or the last [`Self::take_stats`])
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    pub fn take_stats(&mut self) -> SyncStats {
        std::mem::take(&mut self.stats)
    }

    /// Sync a top-level source into `<destination>/<source name>`
    pub fn sync_root(&mut self, source_root: &Path) -> Result<(), SyncError> {
        let name = source_name(source_root)?;
        self.sync(source_root, Path::new(&name), false)
    }

    /// Reconcile `source_dir` into `<destination>/<relative>`
    ///
    /// `dest_created` tells the call that the destination directory was just
    /// created by the caller, so it is known to exist and to be empty.
    ///
    /// Entries are handled in name order. The first error, including one from
    /// a nested directory, stops the remaining siblings and is returned.
    /// Mirror-mode deletions only start once every source entry is handled.
    pub fn sync(
        &mut self,
        source_dir: &Path,
        relative: &Path,
        dest_created: bool,
    ) -> Result<(), SyncError> {
        info!("Syncing folder {}", source_dir.display());

        let source_entries = list_dir(source_dir)?;
        let source_meta = stat_dir(source_dir)?;
        let dest_dir = self.destination_root.join(relative);

        let (mut index, mut restamp) = if dest_created {
            (DestinationIndex::new(), false)
        } else {
            self.prepare_destination(&dest_dir, &source_meta)?
        };

        for src_entry in &source_entries {
            let name = src_entry.name.as_os_str();
            let src_path = source_dir.join(name);
            let dest_path = dest_dir.join(name);
            let child_relative = relative.join(name);
            debug!("Syncing {}", src_path.display());

            // Taken even when excluded so the entry is never pruned.
            let dest_entry = index.take(name);

            if self
                .excludes
                .is_excluded(name, &root_relative(&child_relative))
            {
                debug!("{} excluded", src_path.display());
                self.stats.record(EntryOutcome::Excluded);
                continue;
            }

            let outcome = match dest_entry {
                None => self.create_entry(src_entry, &src_path, &dest_path, &child_relative)?,
                Some(dest_entry) => self.update_entry(
                    src_entry,
                    &dest_entry,
                    &src_path,
                    &dest_path,
                    &child_relative,
                )?,
            };

            restamp |= outcome.mutates_destination();
            self.stats.record(outcome);
        }

        if self.mirror {
            restamp |= self.prune_orphans(index, &dest_dir, relative)?;
        }

        // Child writes bump the directory's mtime; an existing one may already differ.
        if restamp && !self.dry_run {
            apply_mtime(&dest_dir, source_meta.mtime)?;
        }

        Ok(())
    }

    /// Index an existing destination directory or create a missing one
    ///
    /// The flag is set when the directory's mtime does not (or will not)
    /// match the source once the pass is over.
    fn prepare_destination(
        &mut self,
        dest_dir: &Path,
        source_meta: &DirEntry,
    ) -> Result<(DestinationIndex, bool), SyncError> {
        match fs::metadata(dest_dir) {
            Ok(metadata) if metadata.is_dir() => {
                let stale = metadata.modified().ok() != Some(source_meta.mtime);
                Ok((DestinationIndex::load(dest_dir)?, stale))
            }
            Ok(metadata) => Err(SyncError::KindConflict {
                path: dest_dir.to_path_buf(),
                source_kind: EntryKind::Directory,
                dest_kind: if metadata.is_file() {
                    EntryKind::File
                } else {
                    EntryKind::Special
                },
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist{}", dest_dir.display(), self.marker());
                if !self.dry_run {
                    create_dir_from(dest_dir, source_meta)?;
                }
                self.stats.record(EntryOutcome::DirCreated);
                Ok((DestinationIndex::new(), true))
            }
            Err(source) => Err(SyncError::List {
                path: dest_dir.to_path_buf(),
                source,
            }),
        }
    }

    /// Source entry with no destination counterpart
    fn create_entry(
        &mut self,
        src_entry: &DirEntry,
        src_path: &Path,
        dest_path: &Path,
        child_relative: &Path,
    ) -> Result<EntryOutcome, SyncError> {
        debug!("{} does not exist", dest_path.display());

        if src_entry.is_dir() {
            if !self.dry_run {
                create_dir_from(dest_path, src_entry)?;
            }
            debug!("{} created{}", dest_path.display(), self.marker());
            self.sync(src_path, child_relative, true)?;
            return Ok(EntryOutcome::DirCreated);
        }

        let bytes = self.copy(src_path, dest_path, src_entry)?;
        debug!("{} copied{}", dest_path.display(), self.marker());
        Ok(EntryOutcome::FileCreated { bytes })
    }

    /// Source entry whose name already exists in the destination
    fn update_entry(
        &mut self,
        src_entry: &DirEntry,
        dest_entry: &DirEntry,
        src_path: &Path,
        dest_path: &Path,
        child_relative: &Path,
    ) -> Result<EntryOutcome, SyncError> {
        if src_entry.kind != dest_entry.kind {
            return Err(SyncError::KindConflict {
                path: dest_path.to_path_buf(),
                source_kind: src_entry.kind,
                dest_kind: dest_entry.kind,
            });
        }

        if src_entry.is_dir() {
            self.sync(src_path, child_relative, false)?;
            return Ok(EntryOutcome::Recursed);
        }

        let verdict = detect_change(src_path, src_entry, dest_path, Some(dest_entry))?;
        if !verdict.needs_copy() {
            return Ok(EntryOutcome::Unchanged);
        }

        let bytes = self.copy(src_path, dest_path, src_entry)?;
        debug!(
            "{} copied, {}{}",
            dest_path.display(),
            verdict.reason(),
            self.marker()
        );
        Ok(EntryOutcome::FileUpdated { bytes })
    }

    /// Delete what is left in the index; returns whether anything went
    fn prune_orphans(
        &mut self,
        index: DestinationIndex,
        dest_dir: &Path,
        relative: &Path,
    ) -> Result<bool, SyncError> {
        let mut removed = false;

        for orphan in index.into_orphans() {
            let path = dest_dir.join(&orphan.name);

            if self
                .excludes
                .is_excluded(&orphan.name, &root_relative(&relative.join(&orphan.name)))
            {
                debug!("{} excluded, kept", path.display());
                self.stats.record(EntryOutcome::Excluded);
                continue;
            }

            if !self.dry_run {
                remove_entry(&path)?;
            }
            debug!("Deleted {}{}", path.display(), self.marker());
            self.stats.record(EntryOutcome::Deleted);
            removed = true;
        }

        Ok(removed)
    }

    fn copy(&self, src_path: &Path, dest_path: &Path, entry: &DirEntry) -> Result<u64, SyncError> {
        if self.dry_run {
            Ok(entry.size)
        } else {
            copy_file(src_path, dest_path, entry)
        }
    }

    fn marker(&self) -> &'static str {
        if self.dry_run {
            " (dry run)"
        } else {
            ""
        }
    }
}

fn stat_dir(path: &Path) -> Result<DirEntry, SyncError> {
    let list_error = |source| SyncError::List {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(list_error)?;
    let name = path.file_name().unwrap_or(path.as_os_str());
    DirEntry::from_metadata(name, &metadata).map_err(list_error)
}

/// Drop the leading source-name component
fn root_relative(relative: &Path) -> PathBuf {
    relative.components().skip(1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    fn synchronizer(destination: &Path, mirror: bool) -> TreeSynchronizer {
        TreeSynchronizer::new(&Config {
            destination: destination.to_path_buf(),
            mirror,
            ..Config::default()
        })
        .expect("build synchronizer")
    }

    #[test]
    fn test_root_relative_strips_source_name() {
        assert_eq!(
            root_relative(Path::new("photos/2024/img.jpg")),
            PathBuf::from("2024/img.jpg")
        );
        assert_eq!(root_relative(Path::new("photos")), PathBuf::new());
    }

    #[test]
    fn test_sync_creates_missing_destination_dir() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::write(src.path().join("a.txt"), b"0123456789").expect("write a");

        let mut sync = synchronizer(dst.path(), false);
        sync.sync(src.path(), Path::new("out"), false)
            .expect("sync should succeed");

        assert_eq!(fs::read(dst.path().join("out/a.txt")).unwrap(), b"0123456789");
        assert_eq!(sync.stats().dirs_created, 1);
        assert_eq!(sync.stats().files_created, 1);
        assert_eq!(sync.stats().bytes_copied, 10);
    }

    #[test]
    fn test_dest_created_flag_skips_listing() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::write(src.path().join("a.txt"), b"new").expect("write a");

        // Destination already holds a stale a.txt; with dest_created the call
        // trusts the caller and treats the directory as empty.
        fs::create_dir(dst.path().join("out")).unwrap();
        fs::write(dst.path().join("out/a.txt"), b"old").unwrap();

        let mut sync = synchronizer(dst.path(), false);
        sync.sync(src.path(), Path::new("out"), true).unwrap();

        assert_eq!(sync.stats().files_created, 1);
        assert_eq!(sync.stats().files_unchanged, 0);
        assert_eq!(fs::read(dst.path().join("out/a.txt")).unwrap(), b"new");
    }

    #[test]
    fn test_directory_mtime_restored_after_children_written() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        let nested = src.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("file.txt"), b"content").unwrap();

        let dir_mtime = UNIX_EPOCH + Duration::from_secs(1_234_567_890);
        filetime::set_file_mtime(&nested, filetime::FileTime::from_system_time(dir_mtime))
            .unwrap();

        let mut sync = synchronizer(dst.path(), false);
        sync.sync(src.path(), Path::new("out"), false).unwrap();

        let copied = fs::metadata(dst.path().join("out/nested")).unwrap();
        assert_eq!(copied.modified().unwrap(), dir_mtime);
    }

    #[test]
    fn test_stale_directory_mtime_corrected_without_changes() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::write(src.path().join("a.txt"), b"same").unwrap();

        let mut sync = synchronizer(dst.path(), false);
        sync.sync(src.path(), Path::new("out"), false).unwrap();

        let out = dst.path().join("out");
        let stale = UNIX_EPOCH + Duration::from_secs(42);
        filetime::set_file_mtime(&out, filetime::FileTime::from_system_time(stale)).unwrap();

        let mut again = synchronizer(dst.path(), false);
        again.sync(src.path(), Path::new("out"), false).unwrap();

        assert_eq!(again.stats().files_unchanged, 1);
        assert!(again.stats().is_noop());
        assert_eq!(
            fs::metadata(&out).unwrap().modified().unwrap(),
            fs::metadata(src.path()).unwrap().modified().unwrap()
        );
    }

    #[test]
    fn test_destination_file_where_directory_expected() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::write(dst.path().join("out"), b"not a directory").unwrap();

        let mut sync = synchronizer(dst.path(), false);
        let result = sync.sync(src.path(), Path::new("out"), false);

        assert!(matches!(result, Err(SyncError::KindConflict { .. })));
    }

    #[test]
    fn test_take_stats_resets() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        fs::write(src.path().join("a.txt"), b"a").unwrap();

        let mut sync = synchronizer(dst.path(), false);
        sync.sync(src.path(), Path::new("out"), false).unwrap();

        let first = sync.take_stats();
        assert_eq!(first.files_created, 1);
        assert_eq!(sync.stats(), &SyncStats::default());
    }
}
