//! Config struct definition and default implementation.

use super::types::*;
use crate::guarded::LockWait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for creating guarded temporary directories from the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory new temporary directories are created under.
    /// Unset means the system temporary directory (`$TMPDIR` or `/tmp`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_dir: Option<PathBuf>,

    /// Name prefix of created directories (default: "guardtmp-").
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Whether taking the shared lock waits (`block`) or fails (`fail_fast`)
    /// when another process holds an exclusive lock.
    #[serde(default)]
    pub lock_wait: LockWait,

    /// Environment variable that carries the directory path to `run` children.
    #[serde(default = "default_env_var")]
    pub env_var: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parent_dir: None,
            prefix: default_prefix(),
            lock_wait: LockWait::default(),
            env_var: default_env_var(),
        }
    }
}
