//! # Catalog Error Types
//!
//! Typed error handling for the catalog query layer.
//! Resolver operations return `Result<T, CatalogError>`; a lookup that finds
//! nothing is `Ok(None)` (or an empty list), never an error.

use thiserror::Error;

/// Core error type for catalog resolution
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Backing store failed to answer a query
    #[error("Store error: {0}")]
    Store(String),

    /// Global identifier could not be decoded
    #[error("Invalid global id: {0}")]
    InvalidGlobalId(String),

    /// Requested thumbnail size is not of the form `WIDTHxHEIGHT`
    #[error("Invalid thumbnail size: {size}")]
    InvalidThumbnailSize { size: String },

    /// Pagination cursor could not be decoded
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// Product filter argument is malformed
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Catalog seed could not be parsed or is inconsistent
    #[error("Seed error: {0}")]
    Seed(String),

    /// Configuration errors (bad env values, unknown currency)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CatalogError {
    /// Returns true if the error came from the caller's arguments
    /// rather than from the catalog backend
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CatalogError::InvalidGlobalId(_)
                | CatalogError::InvalidThumbnailSize { .. }
                | CatalogError::InvalidCursor(_)
                | CatalogError::InvalidFilter(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::Store(_) => 503,
            CatalogError::InvalidGlobalId(_) => 400,
            CatalogError::InvalidThumbnailSize { .. } => 400,
            CatalogError::InvalidCursor(_) => 400,
            CatalogError::InvalidFilter(_) => 400,
            CatalogError::Seed(_) => 500,
            CatalogError::Configuration(_) => 500,
        }
    }
}

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
