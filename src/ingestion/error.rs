//! Import Error Types
//!
//! The text parsers are infallible; these errors come from the edges around
//! them: reading input files, loading configuration, choosing an import
//! kind, writing output.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by file-based import helpers and configuration loading.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Failed to read an input or config file.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize parsed records.
    #[error("Failed to serialize parsed records: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Config file exists but does not parse.
    #[error("Invalid config at {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// Import kind other than `npc` or `pc`.
    #[error("Unknown import kind '{0}', expected 'npc' or 'pc'")]
    UnknownKind(String),
}

impl ImportError {
    /// Create an Io error.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
