//! # Taskboard Core
//!
//! Board state engine for a local kanban task board.
//!
//! The [`BoardStore`] owns the board (tasks, columns and column order) and is
//! the only way to change it; every change keeps each task listed in exactly
//! one column whose id equals the task's status, and is persisted whole
//! through a [`BoardGateway`]. The [`drag`] module turns pointer-drag events
//! into store moves. [`analytics`] and [`filter`] are read-only views.

pub mod analytics;
pub mod config;
pub mod domain;
pub mod drag;
pub mod error;
pub mod filter;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use analytics::BoardAnalytics;
pub use config::{load_config, EngineConfig, LastColumnPolicy, MoveIndexPolicy};
pub use domain::{
    board::{initial_data, Board, Column, ColumnId},
    task::{NewTask, Priority, Task, TaskId, TaskUpdate},
};
pub use drag::{reconcile, DragEvent, DragSession, MoveCommand};
pub use error::{Result, TaskboardError};
pub use filter::{AssigneeFilter, TaskFilter};
pub use storage::{BoardGateway, FileStore, KeyValueStore, MemoryStore, UnavailableStore};
pub use store::BoardStore;
