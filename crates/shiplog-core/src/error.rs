//! Error types for shiplog

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ShiplogError
pub type Result<T> = std::result::Result<T, ShiplogError>;

/// Main error type for shiplog operations
#[derive(Debug, Error)]
pub enum ShiplogError {
    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Commit source errors
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Changelog generation errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Mainline branch missing
    #[error("Mainline branch not found (tried {0})")]
    MainlineNotFound(String),

    /// Ref could not be resolved
    #[error("Failed to resolve ref: {0}")]
    RefNotFound(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Commit source errors
#[derive(Debug, Error)]
pub enum SourceError {
    /// The base boundary commit never appeared in the paginated listing
    #[error("Base commit {base} not found after {pages} page(s) of history")]
    BaseNotFound { base: String, pages: usize },

    /// API error from the hosting service
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Changelog generation errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Failed to read an existing changelog document
    #[error("Failed to read changelog at {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },
}
