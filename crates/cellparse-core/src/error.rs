//! Error types for the cellparse-core library.
//!
//! Extraction itself never fails: a field that cannot be found is simply
//! absent. Errors only arise while building catalogs or loading configuration.

use thiserror::Error;

/// Main error type for the cellparse library.
#[derive(Error, Debug)]
pub enum CellparseError {
    /// Street catalog could not be built.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to building a street catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog has no entries.
    #[error("street catalog is empty")]
    Empty,

    /// An entry is unusable.
    #[error("invalid street entry {name:?}: {reason}")]
    InvalidEntry { name: String, reason: String },

    /// The combined lookup pattern failed to compile.
    #[error("failed to compile street pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type for the cellparse library.
pub type Result<T> = std::result::Result<T, CellparseError>;
