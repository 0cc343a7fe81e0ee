//! Constants and default value functions used by the Config struct.

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "GUARDTMP_CONFIG";

// Default value functions for serde
pub(crate) fn default_prefix() -> String {
    "guardtmp-".to_string()
}
pub(crate) fn default_env_var() -> String {
    "GUARDTMP_DIR".to_string()
}
