//! Core type definitions for treesync

mod entry;
mod error;
mod outcome;

pub use entry::{DirEntry, EntryKind};
pub use error::SyncError;
pub use outcome::{EntryOutcome, SyncStats};
