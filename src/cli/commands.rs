//! Command definitions for the pomotask CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{MAX_BREAK_MINUTES, MAX_FOCUS_MINUTES};

// ============================================================================
// CLI Structure
// ============================================================================

/// pomotask - a terminal Pomodoro timer with task accounting
#[derive(Parser, Debug)]
#[command(
    name = "pomotask",
    version,
    about = "Terminal Pomodoro timer that tracks focus time per task",
    long_about = "Run focus intervals and breaks in the terminal.\n\
                  Completed pomodoros and focus time are credited to the selected task.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path of the JSON data file (tasks and settings)
    #[arg(long, global = true, env = "POMOTASK_DATA_FILE", value_name = "PATH")]
    pub data_file: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive timer session in the foreground
    Run(RunArgs),

    /// Manage tasks
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },

    /// Show or change timer settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Task to credit, by id or id prefix
    #[arg(short, long, value_name = "ID")]
    pub task: Option<String>,

    /// Focus intervals before a long break
    #[arg(
        short,
        long,
        value_name = "N",
        default_value = "4",
        value_parser = clap::value_parser!(u32).range(1..=12)
    )]
    pub cycle: u32,

    /// Start the first focus interval immediately
    #[arg(short, long)]
    pub start: bool,
}

// ============================================================================
// Task Subcommands
// ============================================================================

#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommand {
    /// Add a task
    Add {
        /// What the task is about
        #[arg(value_parser = validate_description)]
        description: String,

        /// Planned pomodoros (1-20)
        #[arg(
            short,
            long,
            default_value = "4",
            value_parser = clap::value_parser!(u32).range(1..=20)
        )]
        pomodoros: u32,
    },

    /// List tasks
    List {
        /// Hide completed tasks
        #[arg(long)]
        hide_completed: bool,
    },

    /// Toggle a task between open and done
    Done {
        /// Task id or id prefix
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task id or id prefix
        id: String,
    },
}

// ============================================================================
// Settings Subcommands
// ============================================================================

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,

    /// Change one or more settings
    Set(SettingsArgs),
}

/// Arguments for `settings set`; omitted values stay unchanged
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Focus duration in minutes (1-120)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_FOCUS_MINUTES as i64))]
    pub focus: Option<u32>,

    /// Short break duration in minutes (1-60)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_BREAK_MINUTES as i64))]
    pub short_break: Option<u32>,

    /// Long break duration in minutes (1-60)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_BREAK_MINUTES as i64))]
    pub long_break: Option<u32>,

    /// Start breaks automatically when a focus interval ends
    #[arg(long, value_name = "BOOL")]
    pub auto_start_breaks: Option<bool>,
}

impl SettingsArgs {
    /// Returns true if no setting was given.
    pub fn is_empty(&self) -> bool {
        self.focus.is_none()
            && self.short_break.is_none()
            && self.long_break.is_none()
            && self.auto_start_breaks.is_none()
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates a task description.
///
/// - Must not be blank
/// - Must not exceed 200 characters
fn validate_description(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("task description cannot be empty".to_string());
    }
    if trimmed.chars().count() > 200 {
        return Err("task description must be 200 characters or fewer".to_string());
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// Tests
// ============================================================================
