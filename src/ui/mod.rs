//! User interaction

mod prompt;

pub use prompt::confirm_create;
