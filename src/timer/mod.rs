//! Pomodoro timer engine.
//!
//! This module contains the state machine at the heart of the application:
//! - `engine`: countdown, pause/resume, mode transitions and task accounting
//! - `clock`: monotonic time sources (real and manual)
//! - `error`: rejected control calls
//!
//! The engine has no internal threads. A caller ticks it with
//! [`Timer::update`] roughly once per second and issues control calls from
//! the same loop.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use pomotask::timer::{ManualClock, MockTaskSink, Timer};
//! use pomotask::types::{Settings, TimerMode};
//!
//! let clock = ManualClock::new();
//! let mut timer = Timer::with_clock(Settings::default(), clock.clone());
//! let mut sink = MockTaskSink::new();
//!
//! timer.start().unwrap();
//! clock.advance(Duration::from_secs(25 * 60));
//!
//! assert!(timer.update(&mut sink));
//! assert_eq!(timer.mode(), TimerMode::ShortBreak);
//! ```

mod clock;
mod engine;
mod error;

use std::time::Duration;

use crate::types::TaskId;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{Timer, DEFAULT_POMODOROS_PER_CYCLE};
pub use error::{TimerError, TimerOp};

/// Receives accounting reports from the engine.
///
/// Both calls are fire-and-forget; the engine never reads task data back.
pub trait TaskSink {
    /// One focus interval was earned by `task`.
    fn report_pomodoro_completed(&mut self, task: &TaskId);

    /// `spent` focus time should be added to `task`.
    fn report_time_spent(&mut self, task: &TaskId, spent: Duration);
}

/// A single report captured by [`MockTaskSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskReport {
    PomodoroCompleted(TaskId),
    TimeSpent(TaskId, Duration),
}

/// Task sink that records every report, for tests.
#[derive(Debug, Default)]
pub struct MockTaskSink {
    reports: Vec<TaskReport>,
}

impl MockTaskSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reports(&self) -> &[TaskReport] {
        &self.reports
    }

    #[must_use]
    pub fn pomodoro_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r, TaskReport::PomodoroCompleted(_)))
            .count()
    }

    /// Sum of all reported time.
    #[must_use]
    pub fn total_time(&self) -> Duration {
        self.reports
            .iter()
            .filter_map(|r| match r {
                TaskReport::TimeSpent(_, d) => Some(*d),
                TaskReport::PomodoroCompleted(_) => None,
            })
            .sum()
    }

    pub fn clear(&mut self) {
        self.reports.clear();
    }
}

impl TaskSink for MockTaskSink {
    fn report_pomodoro_completed(&mut self, task: &TaskId) {
        self.reports.push(TaskReport::PomodoroCompleted(*task));
    }

    fn report_time_spent(&mut self, task: &TaskId, spent: Duration) {
        self.reports.push(TaskReport::TimeSpent(*task, spent));
    }
}
