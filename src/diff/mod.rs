//! Change detection between a source file and its destination copy

mod compare;

pub use compare::{detect_change, needs_copy, ChangeVerdict};
