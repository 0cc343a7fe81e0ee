//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::CONFIG_ENV_VAR;
use crate::error::{Error, Result};
use crate::guarded::SystemOps;
use std::path::{Path, PathBuf};

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(Error::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load the effective config.
    ///
    /// `explicit` (from `--config`) wins; otherwise the file named by
    /// `$GUARDTMP_CONFIG` is used when set and non-empty; otherwise defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match Self::source(explicit) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// The config file `resolve` would read, if any.
    pub fn source(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        std::env::var_os(CONFIG_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| Error::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::UserError(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `prefix` must not contain `/` or NUL
    /// - `env_var` must be non-empty and must not contain `=` or NUL
    /// - `parent_dir`, when set, must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.prefix.contains('/') || self.prefix.contains('\0') {
            return Err(Error::UserError(format!(
                "config validation failed: prefix must be a plain name, not a path (found '{}')",
                self.prefix.escape_default()
            )));
        }

        if self.env_var.is_empty() {
            return Err(Error::UserError(
                "config validation failed: env_var must be non-empty".to_string(),
            ));
        }
        if self.env_var.contains('=') || self.env_var.contains('\0') {
            return Err(Error::UserError(format!(
                "config validation failed: env_var must not contain '=' or NUL (found '{}')",
                self.env_var.escape_default()
            )));
        }

        if let Some(parent) = &self.parent_dir
            && parent.as_os_str().is_empty()
        {
            return Err(Error::UserError(
                "config validation failed: parent_dir must be non-empty when set. Remove it to use the system temporary directory.".to_string(),
            ));
        }

        Ok(())
    }

    /// Parent directory to create under; empty means the system default.
    pub fn parent(&self) -> &Path {
        self.parent_dir.as_deref().unwrap_or(Path::new(""))
    }

    /// Directory operations honoring the configured lock wait policy.
    pub fn ops(&self) -> SystemOps {
        SystemOps::new(self.lock_wait)
    }
}
