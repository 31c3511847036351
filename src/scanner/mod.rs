//! Directory scanning

mod listing;

pub use listing::{list_dir, list_dir_raw, DestinationIndex};
