//! pomotask library
//!
//! This library provides the core functionality for the pomotask CLI.
//! It includes:
//! - Timer engine: countdown, pause/resume, focus/break cycling and task accounting
//! - Task list with lookup by id prefix
//! - Settings store with change notification
//! - JSON persistence for tasks and settings
//! - Interactive session loop driving the timer
//! - CLI command parsing and display utilities

pub mod cli;
pub mod session;
pub mod settings;
pub mod storage;
pub mod tasks;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use session::{Session, SessionCommand, SessionEvent, SettingChange};
pub use settings::SettingsManager;
pub use storage::{JsonStorage, StorageError};
pub use tasks::{Task, TaskError, TaskManager};
pub use timer::{Clock, ManualClock, MockTaskSink, SystemClock, TaskSink, Timer, TimerError};
pub use types::{Settings, SettingsError, TaskId, TimerMode, TimerSnapshot, TimerState};
