//! # filekv
//!
//! A minimal persistent key-value store served over HTTP:
//! - Records are JSON objects identified by short string keys
//! - Optional per-record TTL expiry, evaluated lazily at read/delete time
//! - The whole store lives in a single JSON file, rewritten on every mutation
//! - Advisory file locking serializes access across workers and processes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HTTP Server (axum)                      │
//! │        POST /datastore/create  GET /datastore/read           │
//! │               DELETE /datastore/delete                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Record Engine                            │
//! │       (validation, TTL expiry, duplicate rejection)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    File Manager                              │
//! │     (locked load/save of the single JSON store file)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod datastore;
pub mod engine;
pub mod http;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::Config;
pub use engine::Engine;
pub use record::{Record, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of filekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
