//! Error types for sbx-git

use std::path::PathBuf;

/// Result type for sbx-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sbx-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
