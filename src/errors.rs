/*!
 * Error types for the dbtrans library.
 *
 * Library layers (store, disk cache, resolver) return the typed errors
 * below, defined with the thiserror crate. Application glue such as
 * configuration loading and the CLI works with `anyhow::Result`.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the translation store
#[derive(Error, Debug)]
pub enum StoreError {
    /// A row already exists for the (locale, namespace, group, item) tuple
    #[error("Translation already exists: {locale} {code}")]
    ConstraintViolation {
        /// Locale of the conflicting row
        locale: String,
        /// Display code of the conflicting row
        code: String,
    },

    /// No row with the given id
    #[error("Translation not found: id {0}")]
    NotFound(i64),

    /// Underlying SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The connection mutex was poisoned by a panicking holder
    #[error("Failed to acquire database lock: {0}")]
    LockPoisoned(String),
}

/// Errors raised by the on-disk bucket cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// A filesystem operation on a cache artifact failed
    #[error("Cache I/O error at {path:?}: {source}")]
    Io {
        /// Path of the artifact or directory involved
        path: PathBuf,
        /// The originating I/O error
        #[source]
        source: std::io::Error,
    },

    /// A bucket could not be serialized
    #[error("Failed to serialize cache bucket: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CacheError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that prevent the resolver from producing any answer at all
///
/// A missing translation is never an error; it resolves to the key.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The store could not be queried or written
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The cache directory or artifact could not be written
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the translation store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from the disk cache
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Error from translation resolution
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
