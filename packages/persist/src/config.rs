//! Store configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistError;

pub const DEFAULT_DIR_MODE: u32 = 0o755;
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// What to do when removing a persisted body fails for a reason other than
/// the file already being gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteFailurePolicy {
    /// Surface the failure as `PersistError::DeleteFailure`.
    #[default]
    Report,
    /// Log a warning and treat the delete as done.
    Ignore,
}

/// Configuration for a [`FileBodyStore`](crate::FileBodyStore).
///
/// ```rust
/// use bodystore_persist::{DeleteFailurePolicy, PersistConfig};
///
/// let config = PersistConfig::from_json_str(r#"{"root": "/tmp/bodies", "onDeleteFailure": "ignore"}"#).unwrap();
/// assert_eq!(config.dir_mode, 0o755);
/// assert_eq!(config.on_delete_failure, DeleteFailurePolicy::Ignore);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistConfig {
    /// Sandbox root every persisted body lives under.
    pub root: PathBuf,

    /// Mode for directories created under the root (Unix only).
    #[serde(default = "default_dir_mode")]
    pub dir_mode: u32,

    /// Mode for newly created body files (Unix only).
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,

    #[serde(default)]
    pub on_delete_failure: DeleteFailurePolicy,
}

fn default_dir_mode() -> u32 {
    DEFAULT_DIR_MODE
}

fn default_file_mode() -> u32 {
    DEFAULT_FILE_MODE
}

impl PersistConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dir_mode: DEFAULT_DIR_MODE,
            file_mode: DEFAULT_FILE_MODE,
            on_delete_failure: DeleteFailurePolicy::default(),
        }
    }

    pub fn with_dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode;
        self
    }

    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }

    pub fn with_delete_failure_policy(mut self, policy: DeleteFailurePolicy) -> Self {
        self.on_delete_failure = policy;
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| PersistError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }
}
