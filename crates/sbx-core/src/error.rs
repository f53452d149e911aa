//! Error types for sbx-core

use std::path::PathBuf;

/// Result type for sbx-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sbx-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file exists but cannot be parsed
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Configuration value outside its supported range
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Filesystem error from sbx-fs
    #[error(transparent)]
    Fs(#[from] sbx_fs::Error),

    /// Archive error from sbx-archive
    #[error(transparent)]
    Archive(#[from] sbx_archive::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
