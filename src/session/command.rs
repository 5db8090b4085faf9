//! User commands for a running session.

use std::fmt;

use crate::settings::SettingsManager;

/// A control request sent to [`super::Session::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start when stopped, resume when paused, pause when running
    Toggle,
    /// Stop the interval, crediting a pomodoro past the halfway mark
    Stop,
    /// Discard the current interval
    Reset,
    /// Abandon the current break
    SkipBreak,
    /// Credit future pomodoros to the task whose id starts with this prefix
    SelectTask(String),
    /// Stop crediting any task
    ClearTask,
    /// Add a task with the default plan
    AddTask(String),
    /// Toggle the done flag of the task matching this prefix
    ToggleTask(String),
    /// Delete the task matching this prefix
    DeleteTask(String),
    /// Print the task list
    ListTasks,
    /// Print the current settings
    ShowSettings,
    /// Change one setting; the running interval keeps its length
    ChangeSetting(SettingChange),
    /// Stop the timer, save and end the session
    Quit,
}

/// A single settings edit made from inside a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingChange {
    FocusMinutes(u32),
    ShortBreakMinutes(u32),
    LongBreakMinutes(u32),
    AutoStartBreaks(bool),
}

impl SettingChange {
    /// Applies the edit through the manager's clamping setters.
    pub fn apply(self, manager: &SettingsManager) {
        match self {
            Self::FocusMinutes(minutes) => manager.set_focus_minutes(minutes),
            Self::ShortBreakMinutes(minutes) => manager.set_short_break_minutes(minutes),
            Self::LongBreakMinutes(minutes) => manager.set_long_break_minutes(minutes),
            Self::AutoStartBreaks(enabled) => manager.set_auto_start_breaks(enabled),
        }
    }
}

/// An input line that did not map to any command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command '{}' (try: s x r b t n d l o q)", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl SessionCommand {
    /// Parses one line of interactive input.
    ///
    /// An empty line (a bare Enter) toggles, the same as `s` or `space`.
    pub fn parse(line: &str) -> Result<Self, UnknownCommand> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Toggle);
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let unknown = || UnknownCommand(line.to_string());

        let command = match (head.to_ascii_lowercase().as_str(), rest) {
            ("s" | "space" | "start" | "pause", "") => Self::Toggle,
            ("x" | "stop", "") => Self::Stop,
            ("r" | "reset", "") => Self::Reset,
            ("b" | "skip", "") => Self::SkipBreak,
            ("c" | "clear", "") => Self::ClearTask,
            ("l" | "list", "") => Self::ListTasks,
            ("o" | "settings", "") => Self::ShowSettings,
            ("q" | "quit" | "exit", "") => Self::Quit,
            ("t" | "task", arg) => Self::SelectTask(single_word(arg).ok_or_else(unknown)?),
            ("d" | "done", arg) => Self::ToggleTask(single_word(arg).ok_or_else(unknown)?),
            ("del" | "delete", arg) => Self::DeleteTask(single_word(arg).ok_or_else(unknown)?),
            ("n" | "new", description) if !description.is_empty() => {
                Self::AddTask(description.to_string())
            }
            ("focus", arg) => {
                Self::ChangeSetting(SettingChange::FocusMinutes(minutes(arg).ok_or_else(unknown)?))
            }
            ("short", arg) => Self::ChangeSetting(SettingChange::ShortBreakMinutes(
                minutes(arg).ok_or_else(unknown)?,
            )),
            ("long", arg) => Self::ChangeSetting(SettingChange::LongBreakMinutes(
                minutes(arg).ok_or_else(unknown)?,
            )),
            ("auto", arg) => {
                Self::ChangeSetting(SettingChange::AutoStartBreaks(switch(arg).ok_or_else(unknown)?))
            }
            _ => return Err(unknown()),
        };
        Ok(command)
    }
}

fn single_word(arg: &str) -> Option<String> {
    if arg.is_empty() || arg.contains(char::is_whitespace) {
        return None;
    }
    Some(arg.to_string())
}

fn minutes(arg: &str) -> Option<u32> {
    arg.parse().ok()
}

fn switch(arg: &str) -> Option<bool> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}
