//! Configuration for the guardtmp CLI.
//!
//! The config file is YAML. Every field is optional; unknown fields are
//! ignored for forward compatibility. Command-line flags override the file,
//! and the file overrides built-in defaults.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use types::CONFIG_ENV_VAR;
