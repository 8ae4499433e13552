pub mod board;
pub mod priority;
pub mod task;

pub use board::{initial_data, Board, Column, ColumnId};
pub use priority::suggest_priority;
pub use task::{today, NewTask, Priority, Task, TaskId, TaskUpdate};
