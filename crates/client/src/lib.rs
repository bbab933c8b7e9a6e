//! Typed client for the bank-reconciliation REST API.
//!
//! Every operation builds its request, sends it, and hands the response to
//! [`handle_response`]. Nothing is retried, cached, or deduplicated; errors
//! propagate to the caller untouched.

mod client;
mod config;
mod error;
pub mod services;
mod upload;

pub use client::{handle_response, ApiClient};
pub use config::{ClientConfig, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_TIMEOUT};
pub use error::ClientError;
pub use upload::{ExtractoUpload, FileUpload};
