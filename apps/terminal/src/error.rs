//! # Application Errors
//!
//! Fatal startup and I/O errors for the terminal app.
//!
//! Cart rule violations never show up here: the shell prints them and keeps
//! prompting. Only what stops the program is an [`AppError`].

use std::path::PathBuf;

use tally_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Terminal read/write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded.
    ///
    /// ## When This Occurs
    /// - `TALLY_CONFIG` points at a missing file
    /// - The TOML file is malformed or has unknown keys
    /// - No data directory could be determined
    #[error("Configuration error ({path}): {message}")]
    Config { path: PathBuf, message: String },

    /// Snapshot store rejected its settings.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        AppError::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for the terminal app.
pub type AppResult<T> = Result<T, AppError>;
