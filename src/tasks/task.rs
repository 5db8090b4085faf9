//! A single task and its accumulated focus time.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::TaskId;

/// A unit of work that pomodoros are credited to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    pub planned_pomodoros: u32,
    #[serde(default)]
    pub completed_pomodoros: u32,
    /// Stored as whole seconds
    #[serde(default, with = "duration_secs")]
    pub time_spent: Duration,
}

impl Task {
    /// Creates an open task with no time logged.
    pub fn new(description: impl Into<String>, planned_pomodoros: u32) -> Self {
        Self {
            id: TaskId::new(),
            description: description.into(),
            created_at: Utc::now(),
            completed: false,
            planned_pomodoros,
            completed_pomodoros: 0,
            time_spent: Duration::ZERO,
        }
    }

    pub fn toggle_complete(&mut self) {
        self.completed = !self.completed;
    }

    /// Counts one more pomodoro, completing the task once the plan is met.
    pub fn add_completed_pomodoro(&mut self) {
        self.completed_pomodoros += 1;
        if self.completed_pomodoros >= self.planned_pomodoros {
            self.completed = true;
        }
    }

    pub fn add_time_spent(&mut self, spent: Duration) {
        self.time_spent += spent;
    }

    /// Logged time as `"1h 5m"`, or `"25m"` under an hour.
    #[must_use]
    pub fn formatted_time_spent(&self) -> String {
        let total_minutes = self.time_spent.as_secs() / 60;
        let hours = total_minutes / 60;
        let minutes = total_minutes % 60;
        if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        }
    }

    /// Progress against the plan as `"[done/planned]"`.
    #[must_use]
    pub fn pomodoro_progress(&self) -> String {
        format!("[{}/{}]", self.completed_pomodoros, self.planned_pomodoros)
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
