//! Core data types for the Pomodoro timer.
//!
//! This module defines the data structures shared by the engine and its
//! collaborators:
//! - Timer mode and run state
//! - Settings with validation
//! - Opaque task identifiers
//! - Read-only timer snapshots for rendering

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// TimerMode
// ============================================================================

/// Which kind of interval the timer is counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// A work session
    Focus,
    /// A short break between work sessions
    ShortBreak,
    /// A long break at the end of a cycle
    LongBreak,
}

impl TimerMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::ShortBreak => "short_break",
            TimerMode::LongBreak => "long_break",
        }
    }

    /// Returns the human-readable label used on screen.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "FOCUS",
            TimerMode::ShortBreak => "SHORT BREAK",
            TimerMode::LongBreak => "LONG BREAK",
        }
    }

    /// Returns true for either kind of break.
    pub fn is_break(&self) -> bool {
        matches!(self, TimerMode::ShortBreak | TimerMode::LongBreak)
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Focus
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Whether the timer is counting. Orthogonal to [`TimerMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerState {
    Stopped,
    Running,
    Paused,
}

impl TimerState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Stopped => "stopped",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        TimerState::Stopped
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Shortest allowed interval, in minutes.
pub const MIN_MINUTES: u32 = 1;
/// Longest allowed focus interval, in minutes.
pub const MAX_FOCUS_MINUTES: u32 = 120;
/// Longest allowed break, in minutes.
pub const MAX_BREAK_MINUTES: u32 = 60;

fn default_focus_minutes() -> u32 {
    25
}

fn default_short_break_minutes() -> u32 {
    5
}

fn default_long_break_minutes() -> u32 {
    30
}

/// Errors produced when validating [`Settings`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A duration is outside its allowed range.
    #[error("{field} must be between {min} and {max} minutes (got {value})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

/// User-configurable durations and behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Focus duration in minutes (1-120)
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    /// Short break duration in minutes (1-60)
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    /// Long break duration in minutes (1-60)
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    /// Whether a break starts on its own when a focus interval ends
    #[serde(default)]
    pub auto_start_breaks: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            auto_start_breaks: false,
        }
    }
}

impl Settings {
    /// Returns these settings with the given focus duration.
    pub fn with_focus_minutes(mut self, minutes: u32) -> Self {
        self.focus_minutes = minutes;
        self
    }

    /// Returns these settings with the given short break duration.
    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break_minutes = minutes;
        self
    }

    /// Returns these settings with the given long break duration.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = minutes;
        self
    }

    /// Returns these settings with auto-start of breaks toggled.
    pub fn with_auto_start_breaks(mut self, enabled: bool) -> Self {
        self.auto_start_breaks = enabled;
        self
    }

    /// Validates every duration against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first field found out of range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_range("focus_minutes", self.focus_minutes, MAX_FOCUS_MINUTES)?;
        check_range(
            "short_break_minutes",
            self.short_break_minutes,
            MAX_BREAK_MINUTES,
        )?;
        check_range(
            "long_break_minutes",
            self.long_break_minutes,
            MAX_BREAK_MINUTES,
        )?;
        Ok(())
    }

    /// Focus interval length.
    pub fn focus_duration(&self) -> Duration {
        minutes(self.focus_minutes)
    }

    /// Short break length.
    pub fn short_break_duration(&self) -> Duration {
        minutes(self.short_break_minutes)
    }

    /// Long break length.
    pub fn long_break_duration(&self) -> Duration {
        minutes(self.long_break_minutes)
    }

    /// Interval length configured for `mode`.
    pub fn duration_for(&self, mode: TimerMode) -> Duration {
        match mode {
            TimerMode::Focus => self.focus_duration(),
            TimerMode::ShortBreak => self.short_break_duration(),
            TimerMode::LongBreak => self.long_break_duration(),
        }
    }
}

fn check_range(field: &'static str, value: u32, max: u32) -> Result<(), SettingsError> {
    if (MIN_MINUTES..=max).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            field,
            value,
            min: MIN_MINUTES,
            max,
        })
    }
}

fn minutes(value: u32) -> Duration {
    Duration::from_secs(u64::from(value) * 60)
}

// ============================================================================
// TaskId
// ============================================================================

/// Opaque identifier for a task.
///
/// The engine only ever hands it back to the task store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the first eight hex digits, enough to pick a task by hand.
    pub fn short(&self) -> String {
        let mut s = self.0.simple().to_string();
        s.truncate(8);
        s
    }

    /// Returns true if the id starts with `prefix` (hyphens ignored, case-insensitive).
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        let wanted: String = prefix
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        !wanted.is_empty() && self.0.simple().to_string().starts_with(&wanted)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Point-in-time view of the timer for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub mode: TimerMode,
    pub remaining_seconds: u64,
    pub duration_seconds: u64,
    /// Completed share of the interval, 0-100
    pub progress: f64,
    /// Remaining time as `mm:ss`
    pub formatted: String,
    pub completed_pomodoros: u32,
    pub current_task: Option<TaskId>,
}

// ============================================================================
// Tests
// ============================================================================
