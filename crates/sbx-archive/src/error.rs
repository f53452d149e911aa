//! Error types for sbx-archive

use std::path::PathBuf;

/// Result type for sbx-archive operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sbx-archive operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported archive {path}: {message}")]
    UnsupportedArchive { path: PathBuf, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine duration of {path}: {message}")]
    Probe { path: PathBuf, message: String },

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Codec(#[from] sbx_codec::Error),

    #[error(transparent)]
    Fs(#[from] sbx_fs::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn unsupported(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::UnsupportedArchive {
            path: path.into(),
            message: message.into(),
        }
    }
}
