//! Error types for taskbot
//!
//! Exit codes:
//! - 2: User error (bad args, bad config, missing token)
//! - 4: Operation failed (io, corrupt store, platform call)
//!
//! Rejections a user can fix from chat (bad task number, missing admin
//! permission) are replies, not errors.

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskbot CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskbot operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Bot token not set: export {0} or add it to .env")]
    MissingToken(String),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Task store {path} is unreadable: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Platform error: {0}")]
    Platform(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_) | Error::InvalidArgument(_) | Error::MissingToken(_) => {
                exit_codes::USER_ERROR
            }

            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::CorruptStore { .. }
            | Error::Platform(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output, when the error carries any.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::CorruptStore { path, .. } | Error::LockFailed(path) => {
                Some(serde_json::json!({ "path": path }))
            }
            Error::MissingToken(var) => Some(serde_json::json!({ "env": var })),
            _ => None,
        }
    }
}

/// Result type alias for taskbot operations
pub type Result<T> = std::result::Result<T, Error>;
