//! Request handlers
//!
//! Thin bridges from HTTP to the engine: extract, call, wrap. The engine
//! blocks on file locks, so every call runs on the blocking thread pool.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::Engine;
use crate::error::StoreError;

use super::ApiError;

/// Query parameters for read and delete
#[derive(Debug, Deserialize)]
pub(crate) struct KeyQuery {
    key: Option<String>,
}

/// The `{status, message}` success envelope
#[derive(Debug, Serialize)]
pub(crate) struct StatusResponse {
    status: &'static str,
    message: String,
}

impl StatusResponse {
    fn success(message: String) -> Self {
        Self {
            status: "success",
            message,
        }
    }
}

/// POST /datastore/create
pub(crate) async fn create(
    State(engine): State<Arc<Engine>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(body) =
        body.map_err(|_| ApiError::bad_request("the request body must be valid JSON"))?;

    let Value::Object(batch) = body else {
        return Err(StoreError::InvalidFormat(
            "only a JSON object of key-value pairs is acceptable".to_string(),
        )
        .into());
    };

    let message = run_blocking(engine, move |engine| engine.create(batch)).await?;
    Ok(Json(StatusResponse::success(message)))
}

/// GET /datastore/read?key=<key>
pub(crate) async fn read(
    State(engine): State<Arc<Engine>>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<Value>, ApiError> {
    let key = require_key(query)?;

    let fields = run_blocking(engine, move |engine| engine.read(&key)).await?;
    Ok(Json(Value::Object(fields)))
}

/// DELETE /datastore/delete?key=<key>
pub(crate) async fn delete(
    State(engine): State<Arc<Engine>>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let key = require_key(query)?;

    let message = run_blocking(engine, move |engine| engine.delete(&key)).await?;
    Ok(Json(StatusResponse::success(message)))
}

/// GET /health
pub(crate) async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
    }))
}

fn require_key(query: KeyQuery) -> Result<String, ApiError> {
    query
        .key
        .ok_or_else(|| ApiError::bad_request("key is required as a query param"))
}

/// Run a blocking engine operation off the async runtime.
async fn run_blocking<T, F>(engine: Arc<Engine>, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&Engine) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&engine))
        .await
        .map_err(|_| ApiError::internal("datastore worker task failed"))?
        .map_err(ApiError::from)
}
