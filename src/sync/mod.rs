//! Tree synchronization

mod filter;
mod tree;

pub use filter::ExcludeFilter;
pub use tree::TreeSynchronizer;
