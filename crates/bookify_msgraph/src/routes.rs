// --- File: crates/bookify_msgraph/src/routes.rs ---

use crate::auth::TokenStore;
use crate::handlers::{
    book_handler, clear_handler, freebusy_handler, oauth_callback_handler, oauth_start_handler,
    MsState,
};
use crate::service::GraphClient;
use axum::{
    routing::{get, post},
    Router,
};
use bookify_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all Microsoft Graph booking routes.
///
/// Intended to be nested under `/ms` by the backend binary.
pub fn routes(config: Arc<AppConfig>) -> Router {
    let state = Arc::new(MsState {
        config,
        token_store: Arc::new(TokenStore::new()),
        graph: GraphClient::new(),
    });

    Router::new()
        .route("/oauth/start", get(oauth_start_handler))
        .route("/oauth/callback", get(oauth_callback_handler))
        .route("/freebusy", get(freebusy_handler))
        .route("/book", post(book_handler))
        .route("/clear", post(clear_handler))
        .with_state(state)
}
