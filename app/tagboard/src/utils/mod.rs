//! Small shared helpers.

pub mod debounce;
pub mod path;

pub use debounce::Debouncer;
