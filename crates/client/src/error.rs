//! Error types for the reconciliation API client.

use thiserror::Error;

/// Errors surfaced by every service call. Nothing here is retried.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure: connection refused, TLS, body read.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("API error ({status}): {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided detail, or the raw body when it had none.
        detail: String,
    },

    /// Success status but the body did not match the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Request body could not be encoded.
    #[error("Could not encode request: {0}")]
    Encode(String),

    /// Request rejected locally before reaching the server.
    #[error("Invalid input: {0}")]
    Invalid(#[from] conciliador_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
