//! Error types for filekv
//!
//! Provides a unified error type for all operations. Validation and lookup
//! errors are surfaced to clients verbatim; storage errors indicate
//! environment problems and map to server-side failures at the HTTP boundary.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for filekv operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    #[error("incorrect request data format: {0}")]
    InvalidFormat(String),

    #[error("the batch would exceed the 1GB datastore size limit")]
    TooLarge,

    #[error("the key `{key}` exceeds the 32 character limit")]
    KeyTooLong { key: String },

    #[error("the value for key `{key}` exceeds the 16KB size limit")]
    ValueTooLarge { key: String },

    #[error("the datastore file has reached the 1GB size limit")]
    StoreFull,

    // -------------------------------------------------------------------------
    // Conflict Errors
    // -------------------------------------------------------------------------
    #[error("the key `{key}` already exists in the datastore")]
    DuplicateKey { key: String },

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("no data found for the key provided")]
    NotFound,

    #[error("the data for the requested key has expired")]
    Expired,

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("corrupt datastore file: {0}")]
    CorruptData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
