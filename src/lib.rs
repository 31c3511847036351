//! # treesync - One-way directory synchronization
//!
//! Replicates one or more source directories under a destination root.
//! Missing entries are created, files whose size or content hash changed are
//! re-copied, and in mirror mode destination entries absent from the source
//! are removed.

// Module declarations
pub mod config;
pub mod scanner;
pub mod diff;
pub mod executor;
pub mod hash;
pub mod logging;
pub mod sync;
pub mod ui;
pub mod commands;
pub mod types;

// Re-export commonly used types
pub use types::{DirEntry, EntryKind, EntryOutcome, SyncError, SyncStats};
pub use sync::TreeSynchronizer;
pub use config::Config;
