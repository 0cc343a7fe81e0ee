//! Error types for guardtmp.
//!
//! Every variant names the step that failed and keeps the underlying
//! `std::io::Error` as its source, so callers can tell a failed `mkdir`
//! from a failed `flock` without parsing messages.

use crate::exit_codes;
use std::io;
use std::path::PathBuf;

/// Main error type for guardtmp operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The temporary directory could not be created.
    #[error("failed to create temporary directory with prefix '{prefix}' under '{}'", .parent.display())]
    CreationFailed {
        parent: PathBuf,
        prefix: String,
        #[source]
        source: io::Error,
    },

    /// The freshly created directory could not be opened.
    #[error("failed to open temporary directory '{}'", .path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The shared advisory lock could not be acquired.
    #[error("failed to lock temporary directory '{}'", .path.display())]
    LockFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Closing the directory handle failed. The handle is released regardless.
    #[error("failed to close temporary directory '{}'", .path.display())]
    CloseFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The lock state of a path could not be determined.
    #[error("failed to probe lock state of '{}'", .path.display())]
    ProbeFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// User provided invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// The child command of `run` could not be spawned or waited on.
    #[error("failed to run '{program}'")]
    CommandFailed {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::CreationFailed { .. } => exit_codes::SETUP_FAILURE,
            Error::OpenFailed { .. } => exit_codes::SETUP_FAILURE,
            Error::LockFailed { .. } => exit_codes::LOCK_FAILURE,
            Error::CloseFailed { .. } => exit_codes::SETUP_FAILURE,
            Error::ProbeFailed { .. } => exit_codes::SETUP_FAILURE,
            Error::UserError(_) => exit_codes::USER_ERROR,
            Error::CommandFailed { .. } => exit_codes::COMMAND_FAILURE,
        }
    }
}

/// Result type alias for guardtmp operations.
pub type Result<T> = std::result::Result<T, Error>;
