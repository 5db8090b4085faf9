//! Timer engine error types.
//!
//! Every error here describes a control call that did not apply in the
//! current state. The timer is left untouched, so a caller that ignores the
//! error gets plain no-op behaviour.

use std::fmt;

use thiserror::Error;

use crate::types::{TimerMode, TimerState};

/// The control operation that was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOp {
    Start,
    Pause,
    Resume,
    SkipBreak,
}

impl TimerOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerOp::Start => "start",
            TimerOp::Pause => "pause",
            TimerOp::Resume => "resume",
            TimerOp::SkipBreak => "skip break",
        }
    }
}

impl fmt::Display for TimerOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by timer control calls.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// The operation is not valid from the current state and mode.
    #[error("cannot {attempted} while the timer is {state} in {mode} mode")]
    InvalidTransition {
        attempted: TimerOp,
        state: TimerState,
        mode: TimerMode,
    },
}

impl TimerError {
    /// Returns the operation that was rejected.
    #[must_use]
    pub fn attempted(&self) -> TimerOp {
        match self {
            Self::InvalidTransition { attempted, .. } => *attempted,
        }
    }

    /// Returns the state the timer was in when the call was rejected.
    #[must_use]
    pub fn state(&self) -> TimerState {
        match self {
            Self::InvalidTransition { state, .. } => *state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let err = TimerError::InvalidTransition {
            attempted: TimerOp::Pause,
            state: TimerState::Stopped,
            mode: TimerMode::Focus,
        };
        assert_eq!(
            err.to_string(),
            "cannot pause while the timer is stopped in FOCUS mode"
        );
    }

    #[test]
    fn test_accessors() {
        let err = TimerError::InvalidTransition {
            attempted: TimerOp::SkipBreak,
            state: TimerState::Running,
            mode: TimerMode::Focus,
        };
        assert_eq!(err.attempted(), TimerOp::SkipBreak);
        assert_eq!(err.state(), TimerState::Running);
    }

    #[test]
    fn test_op_display() {
        assert_eq!(TimerOp::SkipBreak.to_string(), "skip break");
        assert_eq!(TimerOp::Resume.to_string(), "resume");
    }
}
