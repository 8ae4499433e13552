//! Drag-and-drop reconciliation.
//!
//! Gesture events carry the id of the dragged task ("active") and, while
//! over a drop target, the id under the pointer ("over"). That id is either
//! another task or a column body; which one is decided against the board.
//! [`reconcile`] turns an event into the move the store should apply and is
//! pure, so it can be tested without any gesture machinery.

use crate::{
    domain::{Board, Column, ColumnId, Task, TaskId},
    store::BoardStore,
};

/// A pointer-drag event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Start { active: TaskId },
    Over { active: TaskId, over: Option<String> },
    End { active: TaskId, over: Option<String> },
}

/// Arguments for [`BoardStore::move_task`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCommand {
    pub task_id: TaskId,
    pub source_column: ColumnId,
    pub dest_column: ColumnId,
    pub source_index: usize,
    pub dest_index: usize,
}

/// Where the pointer is relative to the board
enum DropTarget<'a> {
    /// Directly on a column body, e.g. an empty column or below its last card
    ColumnBody(&'a Column),
    /// On a task card, at the given position in its column
    Task(&'a Column, usize),
}

/// Computes the move, if any, that an event implies for the current board.
///
/// While hovering only a transfer onto another column's body moves the
/// task; reordering against other cards is left to the drop. On drop, a
/// column body appends the task (no-op if it is already there) and a task
/// card places the task at that card's position.
pub fn reconcile(board: &Board, event: &DragEvent) -> Option<MoveCommand> {
    match event {
        DragEvent::Start { .. } => None,
        DragEvent::Over { active, over } => {
            let over = over.as_deref()?;
            if over == active.as_str() {
                return None;
            }
            let (source, source_index) = locate_active(board, active)?;
            match locate_target(board, over)? {
                DropTarget::ColumnBody(dest) if dest.id != source.id => {
                    Some(command(active, source, dest, source_index, dest.task_ids.len()))
                }
                _ => None,
            }
        }
        DragEvent::End { active, over } => {
            let over = over.as_deref()?;
            let (source, source_index) = locate_active(board, active)?;
            match locate_target(board, over)? {
                DropTarget::ColumnBody(dest) if dest.id == source.id => None,
                DropTarget::ColumnBody(dest) => {
                    Some(command(active, source, dest, source_index, dest.task_ids.len()))
                }
                DropTarget::Task(dest, dest_index) => {
                    Some(command(active, source, dest, source_index, dest_index))
                }
            }
        }
    }
}

fn locate_active<'a>(board: &'a Board, active: &TaskId) -> Option<(&'a Column, usize)> {
    let column = board.column_of(active)?;
    let index = column.position(active)?;
    Some((column, index))
}

fn locate_target<'a>(board: &'a Board, over: &str) -> Option<DropTarget<'a>> {
    let over_task = TaskId::from(over);
    let column = board
        .ordered_columns()
        .find(|column| column.contains(&over_task) || column.id.as_str() == over)?;

    match column.position(&over_task) {
        Some(index) => Some(DropTarget::Task(column, index)),
        None => Some(DropTarget::ColumnBody(column)),
    }
}

fn command(
    task_id: &TaskId,
    source: &Column,
    dest: &Column,
    source_index: usize,
    dest_index: usize,
) -> MoveCommand {
    MoveCommand {
        task_id: task_id.clone(),
        source_column: source.id.clone(),
        dest_column: dest.id.clone(),
        source_index,
        dest_index,
    }
}

/// Tracks one drag gesture and applies its moves to a store.
///
/// Holds a snapshot of the dragged task between start and end, which is
/// what an overlay under the pointer displays.
#[derive(Debug, Default)]
pub struct DragSession {
    active: Option<Task>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The task being dragged, as it was when the drag started
    pub fn active_task(&self) -> Option<&Task> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Handles an event, returning the move that was applied to the store
    pub fn handle(&mut self, store: &mut BoardStore, event: &DragEvent) -> Option<MoveCommand> {
        match event {
            DragEvent::Start { active } => {
                self.active = store.board().tasks.get(active).cloned();
            }
            DragEvent::End { .. } => self.active = None,
            DragEvent::Over { .. } => {}
        }

        let command = reconcile(store.board(), event)?;
        if store.apply_move(&command) {
            Some(command)
        } else {
            None
        }
    }
}
