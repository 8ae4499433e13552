use crate::domain::task::{today, NewTask, Priority, Task, TaskId};
use crate::error::{Result, TaskboardError};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Identifier of a column, also used as the `status` of the tasks it holds
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    /// Derives a column id from a title: trimmed, lowercased, whitespace
    /// runs collapsed to a single hyphen ("In  Review" -> "in-review")
    pub fn from_title(title: &str) -> Self {
        let id = title
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-");
        Self(id)
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ColumnId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, ordered bucket of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub task_ids: Vec<TaskId>,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            task_ids: Vec::new(),
        }
    }

    /// Position of a task in this column
    pub fn position(&self, task_id: &TaskId) -> Option<usize> {
        self.task_ids.iter().position(|id| id == task_id)
    }

    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.task_ids.contains(task_id)
    }
}

/// Complete board state: tasks, columns and the display order of columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub tasks: HashMap<TaskId, Task>,
    pub columns: HashMap<ColumnId, Column>,
    pub column_order: Vec<ColumnId>,
}

impl Board {
    /// Builds a board with the given empty columns, in order
    pub fn with_columns<I, T>(columns: I) -> Self
    where
        I: IntoIterator<Item = (T, T)>,
        T: Into<String>,
    {
        let mut board = Self::default();
        for (id, title) in columns {
            let id: String = id.into();
            let column = Column::new(id, title);
            board.column_order.push(column.id.clone());
            board.columns.insert(column.id.clone(), column);
        }
        board
    }

    /// Columns in display order
    pub fn ordered_columns(&self) -> impl Iterator<Item = &Column> {
        self.column_order.iter().filter_map(|id| self.columns.get(id))
    }

    /// The column whose `task_ids` contains the task
    pub fn column_of(&self, task_id: &TaskId) -> Option<&Column> {
        self.ordered_columns().find(|column| column.contains(task_id))
    }

    /// Tasks of a column, in column order
    pub fn tasks_in(&self, column_id: &ColumnId) -> Vec<&Task> {
        self.columns
            .get(column_id)
            .map(|column| {
                column
                    .task_ids
                    .iter()
                    .filter_map(|id| self.tasks.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Checks the structural invariants of the board:
    /// `column_order` is a permutation of the column keys, each column's key
    /// matches its id, every task is listed by exactly one column and its
    /// `status` names that column.
    pub fn validate(&self) -> Result<()> {
        let violation = |msg: String| Err(TaskboardError::InvariantViolation(msg));

        let mut ordered = HashSet::new();
        for id in &self.column_order {
            if !ordered.insert(id) {
                return violation(format!("column '{}' appears twice in column order", id));
            }
            if !self.columns.contains_key(id) {
                return violation(format!("column order references unknown column '{}'", id));
            }
        }
        if ordered.len() != self.columns.len() {
            return violation("column order does not cover every column".to_string());
        }

        let mut listed = HashSet::new();
        for (key, column) in &self.columns {
            if key != &column.id {
                return violation(format!("column stored under '{}' has id '{}'", key, column.id));
            }
            for task_id in &column.task_ids {
                if !listed.insert(task_id) {
                    return violation(format!("task '{}' is listed more than once", task_id));
                }
                match self.tasks.get(task_id) {
                    None => {
                        return violation(format!(
                            "column '{}' lists unknown task '{}'",
                            column.id, task_id
                        ))
                    }
                    Some(task) if task.status != column.id => {
                        return violation(format!(
                            "task '{}' has status '{}' but is listed in '{}'",
                            task_id, task.status, column.id
                        ))
                    }
                    Some(_) => {}
                }
            }
        }

        for (key, task) in &self.tasks {
            if key != &task.id {
                return violation(format!("task stored under '{}' has id '{}'", key, task.id));
            }
            if !listed.contains(key) {
                return violation(format!("task '{}' is not listed by any column", key));
            }
        }

        Ok(())
    }
}

/// Seed board used when nothing has been persisted yet: three default
/// columns and one sample task in each
pub fn initial_data() -> Board {
    let mut board = Board::with_columns([
        ("todo", "To Do"),
        ("in-progress", "In Progress"),
        ("done", "Done"),
    ]);
    let now = today();

    let samples = [
        NewTask::new(
            "Design login page",
            "Create a modern minimalist login page with social logins",
            "todo",
            Priority::High,
        )
        .with_due_date(now + Duration::days(3))
        .with_assignee("Sarah Jones"),
        NewTask::new(
            "Implement authentication",
            "Set up JWT authentication flow",
            "in-progress",
            Priority::Medium,
        )
        .with_due_date(now + Duration::days(5))
        .with_assignee("Mike Smith"),
        NewTask::new(
            "Create dashboard layout",
            "Design responsive dashboard with sidebar navigation",
            "done",
            Priority::Low,
        )
        .with_due_date(now - Duration::days(2))
        .with_assignee("Alex Johnson"),
    ];

    for new in samples {
        let task = Task::create(new);
        if let Some(column) = board.columns.get_mut(&task.status) {
            column.task_ids.push(task.id.clone());
        }
        board.tasks.insert(task.id.clone(), task);
    }

    board
}
