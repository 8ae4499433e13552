//! Engine configuration, optionally loaded from a TOML file

use crate::error::{Result, TaskboardError};
use crate::storage::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What `delete_column` does when asked to delete the only remaining column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LastColumnPolicy {
    /// Refuse; the board always keeps at least one column
    #[default]
    Forbid,
    /// Delete the column together with its tasks. The board is left with
    /// no columns; a store opened on such a board starts from the seed board.
    Cascade,
}

/// How `move_task` treats a source index that does not hold the task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveIndexPolicy {
    /// Look the task up in the source column and use its real position
    #[default]
    SelfHeal,
    /// Reject the move
    Strict,
}

/// Board engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Key the board is persisted under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Directory for the file-backed store
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub last_column_policy: LastColumnPolicy,

    #[serde(default)]
    pub move_index_policy: MoveIndexPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            data_dir: None,
            last_column_policy: LastColumnPolicy::default(),
            move_index_policy: MoveIndexPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(TaskboardError::ConfigError(
                "storage_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file, falling back to defaults when the
/// file does not exist
pub fn load_config(path: &Path) -> anyhow::Result<EngineConfig> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(EngineConfig::default());
    }

    let contents = std::fs::read_to_string(path)?;
    let config: EngineConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
    config.validate()?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
