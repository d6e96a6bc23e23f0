//! Client error types.
//!
//! Every failure carries its kind at the point of detection: a 401/403 (or a
//! failed token grant) becomes [`ClientError::Auth`] immediately, a 404 on a
//! fetch becomes [`ClientError::NotFound`]. Callers branch on the kind
//! instead of inspecting nested causes.

use thiserror::Error;

/// Errors surfaced by [`crate::MediaClient`] operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("{kind} '{name}' was not found")]
    NotFound { kind: &'static str, name: String },

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// True for the recoverable not-found class that get-or-create paths
    /// treat as "go create it".
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth(_))
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
