//! Foreground session loop.
//!
//! This module drives a [`Timer`] from three sources:
//! - A one second ticker that advances the countdown
//! - User commands arriving on an mpsc channel
//! - Settings changes arriving on a watch channel
//!
//! Task accounting goes straight into the owned [`TaskManager`], which is
//! saved after every completed interval, on stop, on every task edit and on
//! quit. Settings edited in the session are saved as they are made.

use std::fmt;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::settings::SettingsManager;
use crate::storage::JsonStorage;
use crate::tasks::{Task, TaskManager};
use crate::timer::{Clock, SystemClock, Timer};
use crate::types::{Settings, TaskId, TimerMode, TimerSnapshot};

use super::command::{SessionCommand, SettingChange};

/// Plan given to tasks added from inside a session.
const DEFAULT_PLANNED_POMODOROS: u32 = 4;

// ============================================================================
// SessionEvent
// ============================================================================

/// Events emitted by a running session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Current timer state, sent every tick and after every command
    Tick(TimerSnapshot),
    /// An interval ran to its end
    IntervalCompleted {
        /// Mode that just finished
        finished: TimerMode,
        /// Mode now armed (and possibly already running)
        next: TimerMode,
        /// Focus intervals earned so far
        completed_pomodoros: u32,
    },
    /// Pomodoros are now credited to this task
    TaskSelected { id: TaskId, description: String },
    /// No task is credited any more
    TaskCleared,
    TaskAdded(Task),
    /// A task's done flag flipped
    TaskToggled(Task),
    TaskDeleted(Task),
    /// Tasks visible under the current filter
    TaskList(Vec<Task>),
    /// Reply to [`SessionCommand::ShowSettings`]
    SettingsShown(Settings),
    /// The timer picked up new settings
    SettingsChanged(Settings),
    /// A command could not be applied
    Rejected(String),
}

// ============================================================================
// Session
// ============================================================================

/// Owns the timer, the task list, the settings and their storage for one run.
pub struct Session<C: Clock = SystemClock> {
    timer: Timer<C>,
    tasks: TaskManager,
    settings: SettingsManager,
    settings_rx: watch::Receiver<Settings>,
    storage: JsonStorage,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl Session<SystemClock> {
    /// Creates a session on the system clock.
    pub fn new(
        tasks: TaskManager,
        settings: SettingsManager,
        storage: JsonStorage,
        event_tx: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        let timer = Timer::new(settings.current());
        Self::with_timer(timer, tasks, settings, storage, event_tx)
    }
}

impl<C: Clock> Session<C> {
    /// Creates a session around an existing timer.
    pub fn with_timer(
        timer: Timer<C>,
        tasks: TaskManager,
        settings: SettingsManager,
        storage: JsonStorage,
        event_tx: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        let settings_rx = settings.subscribe();
        Self {
            timer,
            tasks,
            settings,
            settings_rx,
            storage,
            event_tx,
        }
    }

    pub fn timer(&self) -> &Timer<C> {
        &self.timer
    }

    pub fn tasks(&self) -> &TaskManager {
        &self.tasks
    }

    pub fn settings(&self) -> &SettingsManager {
        &self.settings
    }

    /// Starts the timer outside the loop, e.g. for `run --start`.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer is already running.
    pub fn start(&mut self) -> Result<()> {
        self.timer.start().context("failed to start timer")
    }

    /// Selects the task whose id starts with `prefix` and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix matches no task or several.
    pub fn select_task(&mut self, prefix: &str) -> Result<TaskId> {
        let id = self.tasks.resolve(prefix)?;
        self.timer.set_current_task(Some(id));
        if let Some(task) = self.tasks.get(&id) {
            self.emit(SessionEvent::TaskSelected {
                id,
                description: task.description.clone(),
            })?;
        }
        Ok(id)
    }

    /// Runs until [`SessionCommand::Quit`] arrives or the command channel closes.
    ///
    /// # Errors
    ///
    /// Returns an error if the event receiver is gone or the final save fails.
    pub async fn run(&mut self, mut commands: mpsc::UnboundedReceiver<SessionCommand>) -> Result<()> {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Pending settings land before the next command is read.
                biased;

                Ok(()) = self.settings_rx.changed() => {
                    let settings = *self.settings_rx.borrow_and_update();
                    self.timer.set_settings(settings);
                    self.emit(SessionEvent::SettingsChanged(settings))?;
                    self.emit(SessionEvent::Tick(self.timer.snapshot()))?;
                }
                _ = ticker.tick() => {
                    self.tick()?;
                }
                command = commands.recv() => {
                    let command = command.unwrap_or(SessionCommand::Quit);
                    if command == SessionCommand::Quit {
                        break;
                    }
                    self.handle_command(command)?;
                    self.emit(SessionEvent::Tick(self.timer.snapshot()))?;
                }
            }
        }

        self.timer.stop(&mut self.tasks);
        self.persist().context("failed to save tasks on quit")?;
        info!(completed = self.timer.completed_pomodoros(), "session ended");
        Ok(())
    }

    /// Advances the timer by one tick.
    fn tick(&mut self) -> Result<()> {
        let finished = self.timer.mode();
        if self.timer.update(&mut self.tasks) {
            if let Err(e) = self.persist() {
                warn!(error = %e, "failed to save tasks after interval");
            }
            self.emit(SessionEvent::IntervalCompleted {
                finished,
                next: self.timer.mode(),
                completed_pomodoros: self.timer.completed_pomodoros(),
            })?;
        }
        self.emit(SessionEvent::Tick(self.timer.snapshot()))
    }

    fn handle_command(&mut self, command: SessionCommand) -> Result<()> {
        debug!(?command, "command received");
        match command {
            SessionCommand::Toggle => {
                let outcome = if self.timer.is_running() {
                    self.timer.pause()
                } else if self.timer.is_paused() {
                    self.timer.resume()
                } else {
                    self.timer.start()
                };
                self.settle(outcome)
            }
            SessionCommand::Stop => {
                self.timer.stop(&mut self.tasks);
                self.persist_or_warn();
                Ok(())
            }
            SessionCommand::Reset => {
                self.timer.reset();
                Ok(())
            }
            SessionCommand::SkipBreak => {
                let outcome = self.timer.skip_break();
                self.settle(outcome)
            }
            SessionCommand::SelectTask(prefix) => {
                let outcome = self.select_task(&prefix).map(|_| ());
                self.settle(outcome)
            }
            SessionCommand::ClearTask => {
                self.timer.set_current_task(None);
                self.emit(SessionEvent::TaskCleared)
            }
            SessionCommand::AddTask(description) => {
                match self.tasks.add_task(&description, DEFAULT_PLANNED_POMODOROS) {
                    Ok(task) => {
                        let task = task.clone();
                        self.persist_or_warn();
                        self.emit(SessionEvent::TaskAdded(task))
                    }
                    Err(e) => self.settle(Err(e)),
                }
            }
            SessionCommand::ToggleTask(prefix) => match self.tasks.resolve(&prefix) {
                Ok(id) => {
                    self.tasks.toggle_complete(&id);
                    self.persist_or_warn();
                    match self.tasks.get(&id) {
                        Some(task) => self.emit(SessionEvent::TaskToggled(task.clone())),
                        None => Ok(()),
                    }
                }
                Err(e) => self.settle(Err(e)),
            },
            SessionCommand::DeleteTask(prefix) => match self.tasks.resolve(&prefix) {
                Ok(id) => {
                    if self.timer.current_task() == Some(id) {
                        self.timer.set_current_task(None);
                        self.emit(SessionEvent::TaskCleared)?;
                    }
                    match self.tasks.delete_task(&id) {
                        Some(task) => {
                            self.persist_or_warn();
                            self.emit(SessionEvent::TaskDeleted(task))
                        }
                        None => Ok(()),
                    }
                }
                Err(e) => self.settle(Err(e)),
            },
            SessionCommand::ListTasks => {
                let tasks = self.tasks.filtered_tasks().into_iter().cloned().collect();
                self.emit(SessionEvent::TaskList(tasks))
            }
            SessionCommand::ShowSettings => {
                self.emit(SessionEvent::SettingsShown(self.settings.current()))
            }
            SessionCommand::ChangeSetting(change) => {
                self.change_setting(change);
                Ok(())
            }
            SessionCommand::Quit => Ok(()),
        }
    }

    /// Publishes the edit on the settings channel and saves it.
    fn change_setting(&self, change: SettingChange) {
        change.apply(&self.settings);
        if let Err(e) = self.storage.save_settings(&self.settings.current()) {
            warn!(error = %e, "failed to save settings");
        }
    }

    /// Turns a refused command into a [`SessionEvent::Rejected`].
    fn settle<E: fmt::Display>(&self, outcome: std::result::Result<(), E>) -> Result<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!(error = %e, "command ignored");
                self.emit(SessionEvent::Rejected(e.to_string()))
            }
        }
    }

    fn persist(&self) -> Result<()> {
        self.storage
            .save_tasks(self.tasks.tasks())
            .context("failed to save tasks")
    }

    fn persist_or_warn(&self) {
        if let Err(e) = self.persist() {
            warn!(error = %e, "failed to save tasks");
        }
    }

    fn emit(&self, event: SessionEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .context("failed to send session event")
    }
}

// ============================================================================
// Tests
// ============================================================================
