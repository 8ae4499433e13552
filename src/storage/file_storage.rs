use crate::{
    error::{Result, TaskboardError},
    storage::KeyValueStore,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// File-based key-value store: one `<key>.json` file per key in a directory
pub struct FileStore {
    root_path: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at the given directory; it is created on first write
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    fn value_file(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(TaskboardError::InvalidStorageKey(key.to_string()));
        }
        Ok(self.root_path.join(format!("{}.json", key)))
    }

    fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_path.exists() {
            fs::create_dir_all(&self.root_path)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_file(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.value_file(key)?;
        self.ensure_directory_exists()?;

        // Write beside the target and rename over it so a reader never sees
        // a half-written board.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.value_file(key)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
