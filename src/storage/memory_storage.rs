use crate::{
    error::{Result, TaskboardError},
    storage::KeyValueStore,
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// In-process key-value store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| TaskboardError::StorageUnavailable("memory store poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Store for environments without durable storage; every call fails
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(TaskboardError::StorageUnavailable("no durable storage".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(TaskboardError::StorageUnavailable("no durable storage".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(TaskboardError::StorageUnavailable("no durable storage".to_string()))
    }
}
