use thiserror::Error;
use tracing::warn;

use crate::api::ApiError;

/// Everything that can go wrong while loading. None of these are fatal.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Persisted document unreadable or not a valid document.
    #[error("Cache read failed: {0:#}")]
    CacheRead(anyhow::Error),

    /// Request did not complete or returned a non-success status.
    #[error("Network error: {0}")]
    Network(ApiError),

    /// Response body was not a valid document.
    #[error("Remote document invalid: {0}")]
    RemoteParse(ApiError),
}

impl From<ApiError> for LoadError {
    fn from(err: ApiError) -> Self {
        if err.is_parse_error() {
            LoadError::RemoteParse(err)
        } else {
            LoadError::Network(err)
        }
    }
}

impl LoadError {
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::CacheRead(_) => "cache_read",
            LoadError::Network(_) => "network",
            LoadError::RemoteParse(_) => "remote_parse",
        }
    }
}

/// Error policy for the load flow: log the failure and carry on with
/// whatever data is already available. Users only ever see stale data or
/// the "data unavailable" message, never the error itself.
pub fn degrade_silently(err: &LoadError) {
    warn!(kind = err.kind(), error = %err, "City data load step failed, keeping available data");
}
