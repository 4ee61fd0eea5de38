use serde::Deserialize;
use thiserror::Error;

/// Failure of a request against the analysis backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response; `detail` is what the backend said, if anything.
    #[error("{detail}")]
    Http { status: u16, detail: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to build request: {0}")]
    Request(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Local storage is not available in this browser")]
    Unavailable,

    #[error("Failed to write '{key}': {message}")]
    Write { key: String, message: String },
}

/// A configuration layer that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Ignoring malformed {global}: {message}")]
    MalformedRuntimeConfig { global: String, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

impl ApiError {
    /// Build an `Http` error from a response status and its raw body.
    ///
    /// The backend answers failures with `{"detail": ...}`. A string detail is
    /// used as-is; structured details (validation errors) are kept as JSON text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail)
            .and_then(|d| match d {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
                serde_json::Value::String(_) | serde_json::Value::Null => None,
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        ApiError::Http { status, detail }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => ApiError::Decode(e.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}
