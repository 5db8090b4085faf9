//! Display utilities for the pomotask CLI.
//!
//! This module provides formatted output for:
//! - The live status line of a running session
//! - Task tables
//! - Settings
//! - Error messages

use std::io::{self, Write};

use crate::session::SessionEvent;
use crate::tasks::Task;
use crate::types::{Settings, TimerMode, TimerSnapshot, TimerState};

/// Number of cells in the progress bar.
pub const BAR_WIDTH: usize = 30;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    // ------------------------------------------------------------------------
    // Session output
    // ------------------------------------------------------------------------

    /// Redraws the status line in place.
    pub fn show_status_line(snapshot: &TimerSnapshot, task: Option<&str>) {
        let mut stdout = io::stdout().lock();
        // \x1b[K clears whatever a longer previous line left behind
        let _ = write!(stdout, "\r{}\x1b[K", Self::format_status_line(snapshot, task));
        let _ = stdout.flush();
    }

    /// Prints a one-off message on its own line below the status line.
    pub fn show_session_message(message: &str) {
        println!("\r{message}\x1b[K");
    }

    /// Renders a session event that is not a plain tick.
    pub fn show_session_event(event: &SessionEvent) {
        match event {
            SessionEvent::IntervalCompleted {
                finished,
                next,
                completed_pomodoros,
            } => Self::show_session_message(&Self::format_completion(
                *finished,
                *next,
                *completed_pomodoros,
            )),
            SessionEvent::TaskSelected { id, description } => {
                Self::show_session_message(&format!("Working on {} ({})", description, id.short()));
            }
            SessionEvent::TaskCleared => Self::show_session_message("No task selected"),
            SessionEvent::TaskAdded(task) => Self::show_session_message(&format!(
                "Added {} {} {}",
                task.id.short(),
                task.description,
                task.pomodoro_progress()
            )),
            SessionEvent::TaskToggled(task) => {
                let state = if task.completed { "done" } else { "open" };
                Self::show_session_message(&format!(
                    "{} {} is now {}",
                    task.id.short(),
                    task.description,
                    state
                ));
            }
            SessionEvent::TaskDeleted(task) => Self::show_session_message(&format!(
                "Deleted {} {}",
                task.id.short(),
                task.description
            )),
            SessionEvent::TaskList(tasks) if tasks.is_empty() => {
                Self::show_session_message("No tasks");
            }
            SessionEvent::TaskList(tasks) => {
                for task in tasks {
                    Self::show_session_message(&Self::format_task_row(task));
                }
            }
            SessionEvent::SettingsShown(settings) => {
                Self::show_session_message(&Self::format_settings_summary(settings));
            }
            SessionEvent::SettingsChanged(settings) => Self::show_session_message(&format!(
                "Settings saved: {} (from the next interval)",
                Self::format_settings_summary(settings)
            )),
            SessionEvent::Rejected(reason) => Self::show_session_message(&format!("! {reason}")),
            SessionEvent::Tick(_) => {}
        }
    }

    pub fn show_session_help() {
        println!("Commands: s/space start-pause, x stop, r reset, b skip break, q quit");
        println!("  tasks:    t <id> select, c clear, n <text> add, d <id> done, del <id> delete, l list");
        println!("  settings: o show, focus <min>, short <min>, long <min>, auto on|off");
    }

    // ------------------------------------------------------------------------
    // Task output
    // ------------------------------------------------------------------------

    pub fn show_task_added(task: &Task) {
        println!(
            "Added {} {} {}",
            task.id.short(),
            task.description,
            task.pomodoro_progress()
        );
    }

    pub fn show_task_list(tasks: &[&Task]) {
        if tasks.is_empty() {
            println!("No tasks");
            return;
        }
        for task in tasks {
            println!("{}", Self::format_task_row(task));
        }
    }

    pub fn show_task_toggled(task: &Task) {
        let state = if task.completed { "done" } else { "open" };
        println!("{} {} is now {}", task.id.short(), task.description, state);
    }

    pub fn show_task_deleted(task: &Task) {
        println!("Deleted {} {}", task.id.short(), task.description);
    }

    // ------------------------------------------------------------------------
    // Settings output
    // ------------------------------------------------------------------------

    pub fn show_settings(settings: &Settings) {
        println!("focus:             {} min", settings.focus_minutes);
        println!("short break:       {} min", settings.short_break_minutes);
        println!("long break:        {} min", settings.long_break_minutes);
        println!("auto-start breaks: {}", settings.auto_start_breaks);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {message}");
    }

    // ------------------------------------------------------------------------
    // Formatting
    // ------------------------------------------------------------------------

    /// `"{MODE} {mm:ss} [{bar}] {pct}%  #{count}  {task}"`
    pub fn format_status_line(snapshot: &TimerSnapshot, task: Option<&str>) -> String {
        let mut line = format!(
            "{} {} [{}] {:.0}%  #{}",
            snapshot.mode.label(),
            snapshot.formatted,
            Self::progress_bar(snapshot.progress),
            snapshot.progress,
            snapshot.completed_pomodoros
        );
        if let Some(task) = task {
            line.push_str("  ");
            line.push_str(task);
        }
        if snapshot.state == TimerState::Paused {
            line.push_str("  (paused)");
        }
        line
    }

    /// A `BAR_WIDTH` cell bar filled in proportion to `progress` (0-100).
    pub fn progress_bar(progress: f64) -> String {
        let ratio = (progress / 100.0).clamp(0.0, 1.0);
        let filled = (ratio * BAR_WIDTH as f64).round() as usize;
        format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
    }

    pub fn format_task_row(task: &Task) -> String {
        let mark = if task.completed { "x" } else { " " };
        format!(
            "[{}] {}  {} {} {}",
            mark,
            task.id.short(),
            task.pomodoro_progress(),
            task.formatted_time_spent(),
            task.description
        )
    }

    /// One-line settings view used inside a session.
    pub fn format_settings_summary(settings: &Settings) -> String {
        format!(
            "focus {}m, short break {}m, long break {}m, auto-start {}",
            settings.focus_minutes,
            settings.short_break_minutes,
            settings.long_break_minutes,
            if settings.auto_start_breaks { "on" } else { "off" }
        )
    }

    fn format_completion(finished: TimerMode, next: TimerMode, completed: u32) -> String {
        match finished {
            TimerMode::Focus => format!(
                "Pomodoro #{completed} done. Next: {}",
                next.label().to_lowercase()
            ),
            TimerMode::ShortBreak | TimerMode::LongBreak => {
                format!("{} over. Back to focus", finished.label().to_lowercase())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
