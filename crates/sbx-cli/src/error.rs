//! Error types for sbx-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from sbx-core
    #[error(transparent)]
    Core(#[from] sbx_core::Error),

    /// Error from sbx-archive
    #[error(transparent)]
    Archive(#[from] sbx_archive::Error),

    /// Error from sbx-git
    #[error(transparent)]
    Git(#[from] sbx_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
