//! In-memory task list with accounting hooks for the timer.

use std::time::Duration;

use tracing::{debug, warn};

use crate::timer::TaskSink;
use crate::types::TaskId;

use super::error::{Result, TaskError};
use super::task::Task;

/// Ordered collection of tasks.
#[derive(Debug, Clone)]
pub struct TaskManager {
    tasks: Vec<Task>,
    show_completed: bool,
}

impl Default for TaskManager {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            show_completed: true,
        }
    }
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a manager over previously stored tasks.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let mut manager = Self::new();
        manager.load_tasks(tasks);
        manager
    }

    /// Adds a task to the end of the list.
    ///
    /// # Errors
    ///
    /// Fails on a blank description or a plan of zero pomodoros.
    pub fn add_task(&mut self, description: &str, planned_pomodoros: u32) -> Result<&Task> {
        let description = description.trim();
        if description.is_empty() {
            return Err(TaskError::EmptyDescription);
        }
        if planned_pomodoros == 0 {
            return Err(TaskError::InvalidPlannedPomodoros(planned_pomodoros));
        }

        let task = Task::new(description, planned_pomodoros);
        debug!(id = %task.id, "task added");
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *id)
    }

    pub fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == *id)
    }

    /// Removes and returns the task, if present.
    pub fn delete_task(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == *id)?;
        Some(self.tasks.remove(index))
    }

    /// Flips the completed flag. Returns false if the task does not exist.
    pub fn toggle_complete(&mut self, id: &TaskId) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.toggle_complete();
                true
            }
            None => false,
        }
    }

    pub fn toggle_show_completed(&mut self) {
        self.show_completed = !self.show_completed;
    }

    pub fn show_completed(&self) -> bool {
        self.show_completed
    }

    /// Tasks to display, honouring the show-completed flag.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| self.show_completed || !t.completed)
            .collect()
    }

    pub fn incomplete_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.completed).collect()
    }

    pub fn completed_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.completed).collect()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Replaces the whole list.
    pub fn load_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Finds the single task whose id starts with `prefix`.
    ///
    /// # Errors
    ///
    /// [`TaskError::NotFound`] when nothing matches and
    /// [`TaskError::AmbiguousId`] when more than one task does.
    pub fn resolve(&self, prefix: &str) -> Result<TaskId> {
        let prefix = prefix.trim();
        let mut matches = self.tasks.iter().filter(|t| t.id.matches_prefix(prefix));

        match (matches.next(), matches.count()) {
            (None, _) => Err(TaskError::NotFound(prefix.to_string())),
            (Some(task), 0) => Ok(task.id),
            (Some(_), rest) => Err(TaskError::AmbiguousId {
                prefix: prefix.to_string(),
                count: rest + 1,
            }),
        }
    }
}

impl TaskSink for TaskManager {
    fn report_pomodoro_completed(&mut self, task: &TaskId) {
        match self.get_mut(task) {
            Some(t) => t.add_completed_pomodoro(),
            None => warn!(id = %task, "pomodoro reported for unknown task"),
        }
    }

    fn report_time_spent(&mut self, task: &TaskId, spent: Duration) {
        match self.get_mut(task) {
            Some(t) => t.add_time_spent(spent),
            None => warn!(id = %task, "time reported for unknown task"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
