//! HTTP Module
//!
//! The axum surface over the record engine.
//!
//! ## Endpoints
//! - `POST /datastore/create` — body: JSON object of key → record object
//! - `GET /datastore/read?key=<key>` — flat record JSON, `CreatedAt` stripped
//! - `DELETE /datastore/delete?key=<key>`
//! - `GET /health` — liveness probe
//!
//! ## Status Mapping
//! - validation / conflict errors → 400 `{"status":"error","message":...}`
//! - not-found / expired → 404
//! - storage errors (IO, corrupt file) → 500

mod error;
mod handlers;

pub use error::ApiError;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::engine::Engine;

/// Build the application router over a shared engine.
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/datastore/create", post(handlers::create))
        .route("/datastore/read", get(handlers::read))
        .route("/datastore/delete", delete(handlers::delete))
        .route("/health", get(handlers::health))
        .with_state(engine)
}
