//! Task list management.
//!
//! This module provides:
//! - `Task`: description, plan and accumulated focus time
//! - `TaskManager`: ordered list with lookup by id prefix
//! - `TaskError`: validation and lookup failures
//!
//! `TaskManager` implements [`crate::timer::TaskSink`], so the timer engine
//! credits pomodoros and time straight into the list.

mod error;
mod manager;
mod task;

pub use error::{Result, TaskError};
pub use manager::TaskManager;
pub use task::Task;
