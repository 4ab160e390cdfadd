// --- File: crates/bookify_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all Bookify crates.
///
/// Provider crates keep their own error enums and convert into this one at
/// the handler boundary, where it maps onto an HTTP status code.
#[derive(Error, Debug)]
pub enum BookifyError {
    /// No valid access token is held for the calendar provider.
    #[error("Authentication required: {0}")]
    AuthRequired(String),

    /// A required booking field is missing or a date failed to parse.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The requested slot is no longer free.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An underlying calendar API call failed.
    #[error("Remote service error: {service_name} - {message}")]
    RemoteServiceError {
        service_name: String,
        message: String,
    },

    /// A required integration is not configured.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error that doesn't fit into any other category.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BookifyError {
    fn status_code(&self) -> u16 {
        match self {
            BookifyError::AuthRequired(_) => 401,
            BookifyError::ValidationError(_) => 400,
            BookifyError::Conflict(_) => 409,
            BookifyError::RemoteServiceError { .. } => 500,
            BookifyError::ConfigError(_) => 500,
            BookifyError::InternalError(_) => 500,
        }
    }
}

// Common error conversions
impl From<reqwest::Error> for BookifyError {
    fn from(err: reqwest::Error) -> Self {
        BookifyError::RemoteServiceError {
            service_name: "http".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BookifyError {
    fn from(err: serde_json::Error) -> Self {
        BookifyError::ValidationError(err.to_string())
    }
}

// Utility constructors used across the provider crates.
pub fn auth_required<T: fmt::Display>(message: T) -> BookifyError {
    BookifyError::AuthRequired(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> BookifyError {
    BookifyError::ValidationError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> BookifyError {
    BookifyError::Conflict(message.to_string())
}

pub fn config_error<T: fmt::Display>(message: T) -> BookifyError {
    BookifyError::ConfigError(message.to_string())
}

pub fn remote_service_error<T: fmt::Display>(service_name: &str, message: T) -> BookifyError {
    BookifyError::RemoteServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
