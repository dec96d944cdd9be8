/// Task board filtering
///
/// A [`BoardFilter`] narrows a set of tasks by status and priority, the
/// same way the dashboard's board view does. A `None` dimension means
/// "All" and matches every task.

use serde::{Deserialize, Serialize};

use crate::models::task::{Task, TaskPriority, TaskStatus};

/// Filter criteria for a task board view
///
/// Both dimensions are optional and combine with AND: a task matches
/// when it passes every dimension that is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardFilter {
    /// Only show tasks with this status (None = all statuses)
    pub status: Option<TaskStatus>,

    /// Only show tasks with this priority (None = all priorities)
    pub priority: Option<TaskPriority>,
}

impl BoardFilter {
    /// A filter that matches every task
    pub fn all() -> Self {
        Self::default()
    }

    /// Whether this filter matches every task
    pub fn is_unfiltered(&self) -> bool {
        self.status.is_none() && self.priority.is_none()
    }

    /// Checks whether a single task passes the filter
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        true
    }

    /// Applies the filter to a task list, preserving input order
    pub fn apply(&self, tasks: Vec<Task>) -> Vec<Task> {
        if self.is_unfiltered() {
            return tasks;
        }
        tasks.into_iter().filter(|t| self.matches(t)).collect()
    }
}
