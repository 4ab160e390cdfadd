// --- File: crates/bookify_common/src/routes.rs ---

use crate::handlers::{health_handler, test_handler};
use axum::{routing::get, Router};

/// Creates a router containing routes common to every deployment.
pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/test", get(test_handler))
}
