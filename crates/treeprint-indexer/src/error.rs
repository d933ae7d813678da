//! Indexer error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort an indexing, storage or configuration call.
///
/// Per-file problems met during a walk are not represented here: they are
/// logged and the file is left out of the result.
#[derive(Debug, Error)]
pub enum IndexerError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted representation could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// Path not found or not resolvable
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Walk root resolved to something other than a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl From<serde_json::Error> for IndexerError {
    fn from(e: serde_json::Error) -> Self {
        IndexerError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for IndexerError {
    fn from(e: serde_yaml::Error) -> Self {
        IndexerError::Config(e.to_string())
    }
}

/// Result alias used across the indexer.
pub type Result<T> = std::result::Result<T, IndexerError>;
