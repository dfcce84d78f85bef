//! Error types for technotes.
//!
//! This module defines the crate-wide error type used by the store, the
//! configuration layer, the renderer and the server. Input validation has its
//! own type, [`crate::post::ValidationError`], because it is reported back to
//! the author rather than treated as a failure.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for technotes operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to read or parse the posts document at startup.
    #[error("failed to load posts from {path}: {message}")]
    DocumentLoad {
        /// Path to the posts document.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    /// Failed to flush the collection back to the posts document.
    #[error("failed to persist posts to {path}: {source}")]
    Persist {
        /// Path to the posts document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Another writer held the document lock for too long.
    #[error(
        "posts document {path} is locked by another writer; \
         remove {lock} if no other technotes process is running"
    )]
    Locked {
        /// Path to the posts document.
        path: PathBuf,
        /// Path to the lock file.
        lock: PathBuf,
    },

    /// A mutation was attempted without write capability.
    #[error("posts are read-only in {mode} mode")]
    ReadOnly {
        /// The runtime mode that refused the write.
        mode: String,
    },

    /// No post exists with the given id.
    #[error("post not found: {id}")]
    PostNotFound {
        /// The id that was looked up.
        id: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Presentation Errors ===
    /// Template compilation or rendering failed.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    // === I/O Errors ===
    /// File system or socket operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for technotes operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a read-only error for the given mode.
    #[must_use]
    pub fn read_only(mode: impl std::fmt::Display) -> Self {
        Self::ReadOnly {
            mode: mode.to_string(),
        }
    }

    /// Create a not-found error for the given post id.
    #[must_use]
    pub fn post_not_found(id: impl Into<String>) -> Self {
        Self::PostNotFound { id: id.into() }
    }
}
