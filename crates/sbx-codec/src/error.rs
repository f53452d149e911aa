//! Error types for sbx-codec

use std::path::PathBuf;

/// Result type for sbx-codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decomposing or recomposing a document
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path} as JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed tree at {path}: {message}")]
    MalformedTree { path: PathBuf, message: String },

    #[error("Unsupported document: {message}")]
    UnsupportedDocument { message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedTree {
            path: path.into(),
            message: message.into(),
        }
    }
}
