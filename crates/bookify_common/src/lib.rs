// --- File: crates/bookify_common/src/lib.rs ---

// Declare modules within this crate
pub mod error;    // Error taxonomy shared by all crates
pub mod features; // Runtime feature flag handling
pub mod handlers; // Shared HTTP request handlers
pub mod http;     // HTTP utilities
pub mod logging;  // Logging utilities
pub mod routes;   // Shared route definitions
pub mod services; // Service abstractions

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

// Re-export error types and utilities for easier access
pub use error::{
    auth_required, config_error, conflict, remote_service_error, validation_error, BookifyError,
    HttpStatusCode,
};

// Re-export HTTP utilities for easier access
pub use http::{
    client::{create_client, HTTP_CLIENT},
    IntoHttpResponse,
};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_error};

// Re-export feature flag handling utilities for easier access
pub use features::{is_feature_enabled, is_gcal_enabled, is_msgraph_enabled};
