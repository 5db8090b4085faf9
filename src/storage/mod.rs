//! Persistence for tasks and settings.
//!
//! Everything lives in one JSON document so a single `--data-file` flag is
//! enough to point the CLI at an isolated data set.

mod error;
mod json;

pub use error::{Result, StorageError};
pub use json::JsonStorage;
