//! The board store: sole owner of the board and the only place it is mutated.
//!
//! Every operation checks all of its preconditions before touching the board,
//! so an operation either applies completely or not at all. Unknown ids are
//! silent no-ops (logged at debug level). Every operation that changes the
//! board persists the whole board afterwards.

use crate::{
    config::{EngineConfig, LastColumnPolicy, MoveIndexPolicy},
    domain::{initial_data, Board, Column, ColumnId, NewTask, Task, TaskId, TaskUpdate},
    drag::MoveCommand,
    storage::{BoardGateway, FileStore, MemoryStore},
};

pub struct BoardStore {
    board: Board,
    gateway: BoardGateway,
    config: EngineConfig,
}

impl BoardStore {
    /// Restores the persisted board, or seeds and persists the demo board
    /// when nothing usable is stored. A board without columns counts as
    /// nothing usable, since no task could be added to it.
    pub fn open(gateway: BoardGateway, config: EngineConfig) -> Self {
        let board = match gateway.load() {
            Some(board) if !board.column_order.is_empty() => board,
            _ => {
                tracing::info!("Seeding initial board under '{}'", gateway.key());
                let board = initial_data();
                gateway.save(&board);
                board
            }
        };
        Self::with_board(board, gateway, config)
    }

    /// Opens a store using the backend named by the configuration: files in
    /// `data_dir` when set, otherwise an in-process store
    pub fn from_config(config: EngineConfig) -> Self {
        let gateway = match &config.data_dir {
            Some(dir) => BoardGateway::with_key(FileStore::new(dir), config.storage_key.clone()),
            None => {
                tracing::debug!("No data_dir configured, board will not outlive the process");
                BoardGateway::with_key(MemoryStore::new(), config.storage_key.clone())
            }
        };
        Self::open(gateway, config)
    }

    /// Wraps an existing board without loading or saving
    pub fn with_board(board: Board, gateway: BoardGateway, config: EngineConfig) -> Self {
        Self {
            board,
            gateway,
            config,
        }
    }

    /// Read-only snapshot of the current board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    /// Creates a task at the end of its status column.
    ///
    /// Returns `None` without changing anything if the status names no column.
    pub fn add_task(&mut self, new: NewTask) -> Option<TaskId> {
        if !self.board.columns.contains_key(&new.status) {
            tracing::debug!("add_task: unknown column '{}'", new.status);
            return None;
        }

        let task = Task::create(new);
        let task_id = task.id.clone();

        if let Some(column) = self.board.columns.get_mut(&task.status) {
            column.task_ids.push(task_id.clone());
        }
        self.board.tasks.insert(task_id.clone(), task);

        self.persist();
        Some(task_id)
    }

    /// Merges `update` into a task and refreshes its `updated_at`.
    ///
    /// A changed status moves the task to the end of the new column. The
    /// whole update is rejected if that column does not exist.
    pub fn update_task(&mut self, task_id: &TaskId, mut update: TaskUpdate) -> bool {
        let Some(current_status) = self.board.tasks.get(task_id).map(|t| t.status.clone()) else {
            tracing::debug!("update_task: unknown task '{}'", task_id);
            return false;
        };

        let new_status = update.status.take().filter(|status| *status != current_status);
        if let Some(status) = &new_status {
            if !self.board.columns.contains_key(status) {
                tracing::debug!("update_task: unknown column '{}'", status);
                return false;
            }
        }

        if let Some(status) = new_status {
            if let Some(column) = self.board.columns.get_mut(&current_status) {
                column.task_ids.retain(|id| id != task_id);
            }
            if let Some(column) = self.board.columns.get_mut(&status) {
                column.task_ids.push(task_id.clone());
            }
            if let Some(task) = self.board.tasks.get_mut(task_id) {
                task.status = status;
            }
        }

        if let Some(task) = self.board.tasks.get_mut(task_id) {
            task.apply(update);
        }

        self.persist();
        true
    }

    /// Removes a task and its entry in its column
    pub fn delete_task(&mut self, task_id: &TaskId) -> bool {
        let Some(task) = self.board.tasks.remove(task_id) else {
            tracing::debug!("delete_task: unknown task '{}'", task_id);
            return false;
        };

        if let Some(column) = self.board.columns.get_mut(&task.status) {
            column.task_ids.retain(|id| id != task_id);
        }

        self.persist();
        true
    }

    /// Moves a task to `dest_index` of `dest_column_id`.
    ///
    /// Within one column this is an array move: the task is removed first and
    /// `dest_index` addresses the shortened list. Across columns the task is
    /// inserted before `dest_index` and takes the destination as its status.
    /// Destination indices past the end append.
    ///
    /// If `source_index` does not hold the task, the configured
    /// [`MoveIndexPolicy`] decides whether the move uses the task's real
    /// position or is rejected.
    pub fn move_task(
        &mut self,
        task_id: &TaskId,
        source_column_id: &ColumnId,
        dest_column_id: &ColumnId,
        source_index: usize,
        dest_index: usize,
    ) -> bool {
        if !self.board.tasks.contains_key(task_id) {
            tracing::debug!("move_task: unknown task '{}'", task_id);
            return false;
        }
        let Some(source) = self.board.columns.get(source_column_id) else {
            tracing::debug!("move_task: unknown source column '{}'", source_column_id);
            return false;
        };
        if !self.board.columns.contains_key(dest_column_id) {
            tracing::debug!("move_task: unknown destination column '{}'", dest_column_id);
            return false;
        }

        let Some(source_index) = self.resolve_source_index(source, task_id, source_index) else {
            return false;
        };

        if source_column_id == dest_column_id {
            if source_index == dest_index {
                return false;
            }
            if let Some(column) = self.board.columns.get_mut(source_column_id) {
                let moved = column.task_ids.remove(source_index);
                let dest_index = dest_index.min(column.task_ids.len());
                column.task_ids.insert(dest_index, moved);
            }
        } else {
            if let Some(column) = self.board.columns.get_mut(source_column_id) {
                column.task_ids.remove(source_index);
            }
            if let Some(column) = self.board.columns.get_mut(dest_column_id) {
                let dest_index = dest_index.min(column.task_ids.len());
                column.task_ids.insert(dest_index, task_id.clone());
            }
            if let Some(task) = self.board.tasks.get_mut(task_id) {
                task.status = dest_column_id.clone();
                task.touch();
            }
        }

        self.persist();
        true
    }

    /// Applies a move produced by drag reconciliation
    pub fn apply_move(&mut self, command: &MoveCommand) -> bool {
        self.move_task(
            &command.task_id,
            &command.source_column,
            &command.dest_column,
            command.source_index,
            command.dest_index,
        )
    }

    /// Adds an empty column at the end of the board.
    ///
    /// The id is derived from the title (see [`ColumnId::from_title`]).
    /// Returns `false` for a blank title or when a column with the derived
    /// id already exists.
    pub fn add_column(&mut self, title: &str) -> bool {
        let column_id = ColumnId::from_title(title);
        if column_id.as_str().is_empty() {
            tracing::debug!("add_column: blank title");
            return false;
        }
        if self.board.columns.contains_key(&column_id) {
            tracing::debug!("add_column: column '{}' already exists", column_id);
            return false;
        }

        self.board.column_order.push(column_id.clone());
        self.board
            .columns
            .insert(column_id.clone(), Column::new(column_id.clone(), title.trim()));
        tracing::info!("Added column '{}'", column_id);

        self.persist();
        true
    }

    /// Deletes a column, moving its tasks to the end of `target_column_id`
    /// when that names another existing column, or else to the first
    /// remaining column.
    ///
    /// Deleting the last column follows the configured [`LastColumnPolicy`].
    pub fn delete_column(&mut self, column_id: &ColumnId, target_column_id: Option<&ColumnId>) -> bool {
        if !self.board.columns.contains_key(column_id) {
            tracing::debug!("delete_column: unknown column '{}'", column_id);
            return false;
        }

        let remaining: Vec<ColumnId> = self
            .board
            .column_order
            .iter()
            .filter(|id| *id != column_id)
            .cloned()
            .collect();

        let Some(first_remaining) = remaining.first().cloned() else {
            return self.delete_last_column(column_id);
        };

        let target = target_column_id
            .filter(|target| *target != column_id && self.board.columns.contains_key(*target))
            .cloned()
            .unwrap_or(first_remaining);

        let Some(deleted) = self.board.columns.remove(column_id) else {
            return false;
        };
        self.board.column_order = remaining;

        for task_id in &deleted.task_ids {
            if let Some(task) = self.board.tasks.get_mut(task_id) {
                task.status = target.clone();
                task.touch();
            }
        }
        if let Some(column) = self.board.columns.get_mut(&target) {
            column.task_ids.extend(deleted.task_ids.iter().cloned());
        }

        tracing::info!(
            "Deleted column '{}', moved {} task(s) to '{}'",
            column_id,
            deleted.task_ids.len(),
            target
        );

        self.persist();
        true
    }

    fn delete_last_column(&mut self, column_id: &ColumnId) -> bool {
        match self.config.last_column_policy {
            LastColumnPolicy::Forbid => {
                tracing::warn!("Refusing to delete '{}', the last column on the board", column_id);
                false
            }
            LastColumnPolicy::Cascade => {
                let Some(deleted) = self.board.columns.remove(column_id) else {
                    return false;
                };
                self.board.column_order.clear();
                for task_id in &deleted.task_ids {
                    self.board.tasks.remove(task_id);
                }
                tracing::info!(
                    "Deleted last column '{}' and its {} task(s)",
                    column_id,
                    deleted.task_ids.len()
                );

                self.persist();
                true
            }
        }
    }

    fn resolve_source_index(&self, source: &Column, task_id: &TaskId, source_index: usize) -> Option<usize> {
        if source.task_ids.get(source_index) == Some(task_id) {
            return Some(source_index);
        }

        match self.config.move_index_policy {
            MoveIndexPolicy::SelfHeal => {
                let found = source.position(task_id);
                match found {
                    Some(actual) => tracing::debug!(
                        "move_task: '{}' is at {} in '{}', not {}",
                        task_id,
                        actual,
                        source.id,
                        source_index
                    ),
                    None => tracing::warn!(
                        "move_task: '{}' is not in column '{}'",
                        task_id,
                        source.id
                    ),
                }
                found
            }
            MoveIndexPolicy::Strict => {
                tracing::warn!(
                    "move_task: index {} of '{}' does not hold '{}'",
                    source_index,
                    source.id,
                    task_id
                );
                None
            }
        }
    }

    fn persist(&self) {
        self.gateway.save(&self.board);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use crate::storage::KeyValueStore;

    fn empty_store() -> (BoardStore, MemoryStore) {
        empty_store_with(EngineConfig::default())
    }

    fn empty_store_with(config: EngineConfig) -> (BoardStore, MemoryStore) {
        let backend = MemoryStore::new();
        let board = Board::with_columns([
            ("todo", "To Do"),
            ("in-progress", "In Progress"),
            ("done", "Done"),
        ]);
        let store = BoardStore::with_board(board, BoardGateway::new(backend.clone()), config);
        (store, backend)
    }

    fn col(id: &str) -> ColumnId {
        ColumnId::from(id)
    }

    fn add(store: &mut BoardStore, title: &str, status: &str) -> TaskId {
        store
            .add_task(NewTask::new(title, "", status, Priority::Medium))
            .unwrap()
    }

    fn ids(store: &BoardStore, column: &str) -> Vec<TaskId> {
        store.board().columns[&col(column)].task_ids.clone()
    }

    fn persisted(backend: &MemoryStore) -> Board {
        BoardGateway::new(backend.clone()).load().unwrap()
    }

    #[test]
    fn test_open_seeds_and_persists() {
        let backend = MemoryStore::new();
        let store = BoardStore::open(BoardGateway::new(backend.clone()), EngineConfig::default());

        assert_eq!(store.board().tasks.len(), 3);
        assert_eq!(&persisted(&backend), store.board());
    }

    #[test]
    fn test_open_restores_saved_board() {
        let backend = MemoryStore::new();
        let (mut first, _) = empty_store();
        add(&mut first, "Keep me", "todo");
        BoardGateway::new(backend.clone()).save(first.board());

        let reopened = BoardStore::open(BoardGateway::new(backend), EngineConfig::default());
        assert_eq!(reopened.board(), first.board());
    }

    #[test]
    fn test_open_reseeds_board_without_columns() {
        let backend = MemoryStore::new();
        let config = EngineConfig {
            last_column_policy: LastColumnPolicy::Cascade,
            ..EngineConfig::default()
        };
        let mut store = BoardStore::with_board(
            Board::with_columns([("only", "Only")]),
            BoardGateway::new(backend.clone()),
            config.clone(),
        );
        assert!(store.delete_column(&col("only"), None));
        assert!(persisted(&backend).columns.is_empty());

        let mut reopened = BoardStore::open(BoardGateway::new(backend.clone()), config);
        assert_eq!(reopened.board().column_order.len(), 3);
        assert_eq!(&persisted(&backend), reopened.board());
        assert!(reopened
            .add_task(NewTask::new("After reset", "", "todo", Priority::Low))
            .is_some());
    }

    #[test]
    fn test_from_config_uses_data_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = EngineConfig {
            data_dir: Some(temp_dir.path().to_path_buf()),
            storage_key: "mine".to_string(),
            ..EngineConfig::default()
        };

        let store = BoardStore::from_config(config.clone());
        let again = BoardStore::from_config(config);
        assert_eq!(store.board(), again.board());
        assert!(temp_dir.path().join("mine.json").exists());
    }

    #[test]
    fn test_add_task_appends_and_persists() {
        let (mut store, backend) = empty_store();
        let a = add(&mut store, "A", "todo");
        let b = add(&mut store, "B", "todo");

        assert_eq!(ids(&store, "todo"), vec![a.clone(), b]);
        assert_eq!(store.board().tasks[&a].status, col("todo"));
        assert_eq!(&persisted(&backend), store.board());
    }

    #[test]
    fn test_add_task_unknown_column_is_noop() {
        let (mut store, backend) = empty_store();
        let result = store.add_task(NewTask::new("A", "", "nowhere", Priority::Low));

        assert!(result.is_none());
        assert!(store.board().tasks.is_empty());
        assert_eq!(backend.get("kanban-board").unwrap(), None);
    }

    #[test]
    fn test_update_task_fields() {
        let (mut store, _) = empty_store();
        let a = add(&mut store, "A", "todo");

        assert!(store.update_task(&a, TaskUpdate::default().title("A2").priority(Priority::High)));

        let task = &store.board().tasks[&a];
        assert_eq!(task.title, "A2");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(ids(&store, "todo"), vec![a]);
    }

    #[test]
    fn test_update_task_status_moves_to_end() {
        let (mut store, _) = empty_store();
        let a = add(&mut store, "A", "todo");
        let b = add(&mut store, "B", "in-progress");

        assert!(store.update_task(&a, TaskUpdate::default().status("in-progress")));

        assert!(ids(&store, "todo").is_empty());
        assert_eq!(ids(&store, "in-progress"), vec![b, a.clone()]);
        assert_eq!(store.board().tasks[&a].status, col("in-progress"));
        assert!(store.board().validate().is_ok());
    }

    #[test]
    fn test_update_task_same_status_keeps_position() {
        let (mut store, _) = empty_store();
        let a = add(&mut store, "A", "todo");
        let b = add(&mut store, "B", "todo");

        assert!(store.update_task(&a, TaskUpdate::default().status("todo").title("A2")));
        assert_eq!(ids(&store, "todo"), vec![a, b]);
    }

    #[test]
    fn test_update_task_unknown_status_rejects_whole_update() {
        let (mut store, _) = empty_store();
        let a = add(&mut store, "A", "todo");

        assert!(!store.update_task(&a, TaskUpdate::default().status("nowhere").title("changed")));
        assert_eq!(store.board().tasks[&a].title, "A");
        assert_eq!(ids(&store, "todo"), vec![a]);
    }

    #[test]
    fn test_update_unknown_task_is_noop() {
        let (mut store, _) = empty_store();
        let before = store.board().clone();
        assert!(!store.update_task(&TaskId::from("ghost"), TaskUpdate::default().title("x")));
        assert_eq!(store.board(), &before);
    }

    #[test]
    fn test_delete_task() {
        let (mut store, backend) = empty_store();
        let a = add(&mut store, "A", "todo");
        let b = add(&mut store, "B", "todo");

        assert!(store.delete_task(&a));
        assert!(!store.delete_task(&a));

        assert_eq!(ids(&store, "todo"), vec![b]);
        assert!(!store.board().tasks.contains_key(&a));
        assert_eq!(&persisted(&backend), store.board());
    }

    #[test]
    fn test_move_within_column() {
        let (mut store, _) = empty_store();
        let a = add(&mut store, "A", "todo");
        let b = add(&mut store, "B", "todo");
        let c = add(&mut store, "C", "todo");

        assert!(store.move_task(&a, &col("todo"), &col("todo"), 0, 2));
        assert_eq!(ids(&store, "todo"), vec![b.clone(), c.clone(), a.clone()]);

        assert!(store.move_task(&a, &col("todo"), &col("todo"), 2, 0));
        assert_eq!(ids(&store, "todo"), vec![a, b, c]);
    }

    #[test]
    fn test_move_within_column_same_index_is_noop() {
        let (mut store, _) = empty_store();
        let a = add(&mut store, "A", "todo");
        let updated_at = store.board().tasks[&a].updated_at;

        assert!(!store.move_task(&a, &col("todo"), &col("todo"), 0, 0));
        assert_eq!(store.board().tasks[&a].updated_at, updated_at);
    }

    #[test]
    fn test_move_across_columns() {
        let (mut store, _) = empty_store();
        let a = add(&mut store, "A", "todo");
        let b = add(&mut store, "B", "done");
        let c = add(&mut store, "C", "done");

        assert!(store.move_task(&a, &col("todo"), &col("done"), 0, 1));

        assert!(ids(&store, "todo").is_empty());
        assert_eq!(ids(&store, "done"), vec![b, a.clone(), c]);
        assert_eq!(store.board().tasks[&a].status, col("done"));
    }

    #[test]
    fn test_move_past_end_appends() {
        let (mut store, _) = empty_store();
        let a = add(&mut store, "A", "todo");
        let b = add(&mut store, "B", "done");

        assert!(store.move_task(&a, &col("todo"), &col("done"), 0, 99));
        assert_eq!(ids(&store, "done"), vec![b, a]);
    }

    #[test]
    fn test_move_with_stale_index_self_heals() {
        let (mut store, _) = empty_store();
        let a = add(&mut store, "A", "todo");
        let b = add(&mut store, "B", "todo");

        assert!(store.move_task(&b, &col("todo"), &col("done"), 0, 0));
        assert_eq!(ids(&store, "todo"), vec![a]);
        assert_eq!(ids(&store, "done"), vec![b]);
        assert!(store.board().validate().is_ok());
    }

    #[test]
    fn test_move_with_stale_index_strict_rejects() {
        let config = EngineConfig {
            move_index_policy: MoveIndexPolicy::Strict,
            ..EngineConfig::default()
        };
        let (mut store, _) = empty_store_with(config);
        let a = add(&mut store, "A", "todo");
        let b = add(&mut store, "B", "todo");

        assert!(!store.move_task(&b, &col("todo"), &col("done"), 0, 0));
        assert_eq!(ids(&store, "todo"), vec![a, b]);
    }

    #[test]
    fn test_move_from_wrong_column_is_rejected() {
        let (mut store, _) = empty_store();
        let a = add(&mut store, "A", "todo");

        assert!(!store.move_task(&a, &col("in-progress"), &col("done"), 0, 0));
        assert_eq!(ids(&store, "todo"), vec![a]);
    }

    #[test]
    fn test_move_unknown_ids_are_noops() {
        let (mut store, _) = empty_store();
        let a = add(&mut store, "A", "todo");

        assert!(!store.move_task(&TaskId::from("ghost"), &col("todo"), &col("done"), 0, 0));
        assert!(!store.move_task(&a, &col("nowhere"), &col("done"), 0, 0));
        assert!(!store.move_task(&a, &col("todo"), &col("nowhere"), 0, 0));
        assert_eq!(ids(&store, "todo"), vec![a]);
    }

    #[test]
    fn test_add_column() {
        let (mut store, _) = empty_store();

        assert!(store.add_column("In Review"));
        assert!(!store.add_column("in   review"));
        assert!(!store.add_column("   "));

        let board = store.board();
        assert_eq!(board.column_order.last(), Some(&col("in-review")));
        assert_eq!(board.columns[&col("in-review")].title, "In Review");
        assert_eq!(board.columns.len(), 4);
    }

    #[test]
    fn test_delete_column_to_explicit_target() {
        let (mut store, _) = empty_store();
        let t1 = add(&mut store, "t1", "in-progress");
        let t2 = add(&mut store, "t2", "in-progress");
        let t3 = add(&mut store, "t3", "done");

        assert!(store.delete_column(&col("in-progress"), Some(&col("done"))));

        let board = store.board();
        assert!(!board.columns.contains_key(&col("in-progress")));
        assert_eq!(board.column_order, vec![col("todo"), col("done")]);
        assert_eq!(ids(&store, "done"), vec![t3, t1.clone(), t2.clone()]);
        assert_eq!(board.tasks[&t1].status, col("done"));
        assert_eq!(board.tasks[&t2].status, col("done"));
    }

    #[test]
    fn test_delete_column_defaults_to_first_remaining() {
        let (mut store, _) = empty_store();
        let t1 = add(&mut store, "t1", "todo");

        assert!(store.delete_column(&col("todo"), None));
        assert_eq!(store.board().column_order[0], col("in-progress"));
        assert_eq!(ids(&store, "in-progress"), vec![t1.clone()]);
        assert_eq!(store.board().tasks[&t1].status, col("in-progress"));
    }

    #[test]
    fn test_delete_column_invalid_target_falls_back() {
        let (mut store, _) = empty_store();
        let t1 = add(&mut store, "t1", "done");

        assert!(store.delete_column(&col("done"), Some(&col("done"))));
        assert_eq!(ids(&store, "todo"), vec![t1.clone()]);

        assert!(store.delete_column(&col("in-progress"), Some(&col("ghost"))));
        assert_eq!(store.board().column_order, vec![col("todo")]);
        assert!(store.board().validate().is_ok());
    }

    #[test]
    fn test_delete_unknown_column_is_noop() {
        let (mut store, _) = empty_store();
        assert!(!store.delete_column(&col("ghost"), None));
        assert_eq!(store.board().columns.len(), 3);
    }

    #[test]
    fn test_delete_last_column_forbidden_by_default() {
        let (mut store, _) = empty_store();
        let t1 = add(&mut store, "t1", "done");
        assert!(store.delete_column(&col("todo"), None));
        assert!(store.delete_column(&col("in-progress"), None));

        assert!(!store.delete_column(&col("done"), None));
        assert_eq!(ids(&store, "done"), vec![t1]);
    }

    #[test]
    fn test_delete_last_column_cascade() {
        let config = EngineConfig {
            last_column_policy: LastColumnPolicy::Cascade,
            ..EngineConfig::default()
        };
        let (mut store, backend) = empty_store_with(config);
        add(&mut store, "t1", "done");
        assert!(store.delete_column(&col("todo"), None));
        assert!(store.delete_column(&col("in-progress"), None));

        assert!(store.delete_column(&col("done"), None));
        let board = store.board();
        assert!(board.columns.is_empty());
        assert!(board.column_order.is_empty());
        assert!(board.tasks.is_empty());
        assert!(board.validate().is_ok());
        assert_eq!(&persisted(&backend), board);
    }
}
