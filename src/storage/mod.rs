use crate::{domain::Board, error::Result};

pub mod file_storage;
pub mod memory_storage;

pub use file_storage::FileStore;
pub use memory_storage::{MemoryStore, UnavailableStore};

/// Key under which the board is stored unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "kanban-board";

/// Durable string key-value store backing the board
pub trait KeyValueStore: Send + Sync {
    /// Reads the value for a key, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value for a key
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes a key; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Loads and saves whole boards under a fixed key.
///
/// Neither operation fails: a missing, unreadable, unparsable or
/// structurally invalid board loads as `None`, and a failed save is logged
/// and reported as `false`.
pub struct BoardGateway {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl BoardGateway {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        Self {
            store: Box::new(store),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn load(&self) -> Option<Board> {
        match self.try_load() {
            Ok(board) => board,
            Err(e) => {
                tracing::warn!("Discarding stored board '{}': {}", self.key, e);
                None
            }
        }
    }

    pub fn save(&self, board: &Board) -> bool {
        match self.try_save(board) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to save board '{}': {}", self.key, e);
                false
            }
        }
    }

    /// Forgets the stored board
    pub fn clear(&self) -> bool {
        match self.store.remove(&self.key) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to clear board '{}': {}", self.key, e);
                false
            }
        }
    }

    fn try_load(&self) -> Result<Option<Board>> {
        let Some(contents) = self.store.get(&self.key)? else {
            tracing::debug!("No stored board under '{}'", self.key);
            return Ok(None);
        };

        let board: Board = serde_json::from_str(&contents)?;
        board.validate()?;
        Ok(Some(board))
    }

    fn try_save(&self, board: &Board) -> Result<()> {
        let json = serde_json::to_string(board)?;
        self.store.set(&self.key, &json)
    }
}
