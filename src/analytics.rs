//! Read-only summaries of a board

use crate::domain::{Board, ColumnId, Priority};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Column treated as "completed" for completion and overdue figures
pub const DONE_COLUMN: &str = "done";

/// Label used for tasks without an assignee
pub const UNASSIGNED: &str = "Unassigned";

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub column_id: ColumnId,
    pub title: String,
    pub count: usize,
    pub percentage: f64,
}

/// Workload of one assignee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssigneeWorkload {
    pub name: String,
    pub total: usize,
    pub by_status: BTreeMap<ColumnId, usize>,
}

/// Tasks grouped by how their due date relates to today
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueDateBuckets {
    pub overdue: usize,
    pub due_today: usize,
    pub due_tomorrow: usize,
    /// Due within the next seven days, after tomorrow
    pub due_this_week: usize,
    pub due_later: usize,
    pub no_due_date: usize,
    /// Past their due date but already done
    pub completed_past_due: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardAnalytics {
    pub total_tasks: usize,
    pub completion_percentage: f64,
    pub columns: Vec<ColumnStats>,
    pub by_priority: BTreeMap<Priority, usize>,
    /// Sorted by total descending, then name
    pub assignees: Vec<AssigneeWorkload>,
    pub due_dates: DueDateBuckets,
}

impl BoardAnalytics {
    pub fn compute(board: &Board, today: NaiveDate) -> Self {
        let total_tasks = board.tasks.len();
        let done = ColumnId::from(DONE_COLUMN);

        let columns: Vec<ColumnStats> = board
            .ordered_columns()
            .map(|column| ColumnStats {
                column_id: column.id.clone(),
                title: column.title.clone(),
                count: column.task_ids.len(),
                percentage: percentage(column.task_ids.len(), total_tasks),
            })
            .collect();

        let done_count = board.tasks.values().filter(|t| t.status == done).count();

        let mut by_priority: BTreeMap<Priority, usize> =
            Priority::ALL.iter().map(|p| (*p, 0)).collect();
        let mut workloads: BTreeMap<String, AssigneeWorkload> = BTreeMap::new();
        let mut due_dates = DueDateBuckets::default();

        for task in board.tasks.values() {
            *by_priority.entry(task.priority).or_default() += 1;

            let name = task.assignee.clone().unwrap_or_else(|| UNASSIGNED.to_string());
            let workload = workloads
                .entry(name.clone())
                .or_insert_with(|| AssigneeWorkload {
                    name,
                    total: 0,
                    by_status: BTreeMap::new(),
                });
            workload.total += 1;
            *workload.by_status.entry(task.status.clone()).or_default() += 1;

            let is_done = task.status == done;
            let past_due = task.is_past_due(today);
            match task.due_date {
                None => due_dates.no_due_date += 1,
                Some(_) if past_due && is_done => due_dates.completed_past_due += 1,
                Some(_) if past_due => due_dates.overdue += 1,
                Some(due) if due == today => due_dates.due_today += 1,
                Some(due) if due == today + Duration::days(1) => due_dates.due_tomorrow += 1,
                Some(due) if due <= today + Duration::days(7) => due_dates.due_this_week += 1,
                Some(_) => due_dates.due_later += 1,
            }
        }

        let mut assignees: Vec<AssigneeWorkload> = workloads.into_values().collect();
        assignees.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

        Self {
            total_tasks,
            completion_percentage: percentage(done_count, total_tasks),
            columns,
            by_priority,
            assignees,
            due_dates,
        }
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}
