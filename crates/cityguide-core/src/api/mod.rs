//! HTTP client for the remote city document.
//!
//! The document is a static JSON file served over plain HTTPS GET, with
//! no authentication, headers or query parameters.

pub mod client;
pub mod error;

pub use client::{ApiClient, REMOTE_JSON_URL};
pub use error::ApiError;
