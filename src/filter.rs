//! Search and filtering over a board's columns

use crate::domain::{Board, ColumnId, Priority, Task, TaskId};

/// Which assignee a filter selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeFilter {
    /// Tasks without an assignee
    Unassigned,
    /// Tasks assigned to this name (case-insensitive)
    Named(String),
}

/// A read-only projection of the board: free-text search plus optional
/// priority and assignee selectors. All criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub search: String,
    pub priority: Option<Priority>,
    pub assignee: Option<AssigneeFilter>,
}

impl TaskFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_assignee(mut self, assignee: AssigneeFilter) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Whether the filter lets everything through
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.priority.is_none() && self.assignee.is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }

        match (&self.assignee, &task.assignee) {
            (None, _) => {}
            (Some(AssigneeFilter::Unassigned), None) => {}
            (Some(AssigneeFilter::Named(name)), Some(assignee))
                if assignee.to_lowercase() == name.to_lowercase() => {}
            (Some(_), _) => return false,
        }

        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        task.title.to_lowercase().contains(&term)
            || task.description.to_lowercase().contains(&term)
            || task
                .assignee
                .as_ref()
                .map(|a| a.to_lowercase().contains(&term))
                .unwrap_or(false)
    }

    /// Ids of the column's tasks that match, in column order
    pub fn visible_task_ids(&self, board: &Board, column_id: &ColumnId) -> Vec<TaskId> {
        board
            .tasks_in(column_id)
            .into_iter()
            .filter(|task| self.matches(task))
            .map(|task| task.id.clone())
            .collect()
    }
}
