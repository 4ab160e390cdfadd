// --- File: crates/bookify_common/src/handlers.rs ---

// HTTP request handlers shared across the application.

use axum::Json;
use serde_json::{json, Value};

/// Liveness probe used by the frontend before rendering the picker widget.
pub async fn health_handler() -> Json<Value> {
    tracing::debug!("health check called");
    Json(json!({ "ok": true }))
}

/// Plain diagnostic route kept around for quick manual checks.
pub async fn test_handler() -> Json<Value> {
    Json(json!({ "message": "Server is working!" }))
}
