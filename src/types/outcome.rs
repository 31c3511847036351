//! EntryOutcome - How a single entry was resolved, and run totals

/// Resolution of one entry during a sync pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Directory missing in destination, created
    DirCreated,

    /// File missing in destination, copied
    FileCreated { bytes: u64 },

    /// File existed but differed, overwritten
    FileUpdated { bytes: u64 },

    /// File existed with identical content
    Unchanged,

    /// Directory existed, descended into
    Recursed,

    /// Orphan removed from destination (mirror mode)
    Deleted,

    /// Matched an exclude pattern, left alone
    Excluded,
}

impl EntryOutcome {
    /// Whether this outcome wrote to or removed from the destination
    pub fn mutates_destination(&self) -> bool {
        matches!(
            self,
            EntryOutcome::DirCreated
                | EntryOutcome::FileCreated { .. }
                | EntryOutcome::FileUpdated { .. }
                | EntryOutcome::Deleted
        )
    }
}

/// Aggregate counters for a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub dirs_created: usize,
    pub dirs_visited: usize,
    pub files_created: usize,
    pub files_updated: usize,
    pub files_unchanged: usize,
    pub entries_deleted: usize,
    pub entries_excluded: usize,
    /// Bytes written by file copies (would-be bytes in dry run)
    pub bytes_copied: u64,
}

impl SyncStats {
    /// Fold an outcome into the totals
    pub fn record(&mut self, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::DirCreated => self.dirs_created += 1,
            EntryOutcome::FileCreated { bytes } => {
                self.files_created += 1;
                self.bytes_copied += bytes;
            }
            EntryOutcome::FileUpdated { bytes } => {
                self.files_updated += 1;
                self.bytes_copied += bytes;
            }
            EntryOutcome::Unchanged => self.files_unchanged += 1,
            EntryOutcome::Recursed => self.dirs_visited += 1,
            EntryOutcome::Deleted => self.entries_deleted += 1,
            EntryOutcome::Excluded => self.entries_excluded += 1,
        }
    }

    /// Number of files written (created + updated)
    pub fn files_copied(&self) -> usize {
        self.files_created + self.files_updated
    }

    /// True when the run left the destination as it found it
    pub fn is_noop(&self) -> bool {
        self.dirs_created == 0 && self.files_copied() == 0 && self.entries_deleted == 0
    }
}
