//! Error taxonomy shared by the source adapters and the HTTP layer.
//!
//! Every adapter call resolves to either data or a [`SourceError`] kind,
//! so the HTTP layer and the overview aggregator can decide uniformly
//! what a failure means: which status code to answer with, or whether to
//! degrade the affected section to an empty value.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failure kinds for everything the dashboard pulls from.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The local task store is not installed, not configured, or its
    /// database file is missing. Answered as 404.
    #[error("{0}")]
    SourceUnavailable(String),

    /// A store was found but reading it failed.
    #[error("{0}")]
    QueryFailed(String),

    /// Bad, expired or missing credential for a remote source.
    #[error("Authentication failed for {service}: {reason}")]
    AuthenticationFailed { service: String, reason: String },

    /// Network or HTTP error talking to a remote API.
    #[error("Request to {service} failed: {reason}")]
    UpstreamRequestFailed { service: String, reason: String },

    /// Malformed request input, e.g. a bad date format. Answered as 400.
    #[error("{0}")]
    ValidationError(String),
}

impl SourceError {
    pub fn auth(service: &str, reason: impl ToString) -> Self {
        SourceError::AuthenticationFailed {
            service: service.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn upstream(service: &str, reason: impl ToString) -> Self {
        SourceError::UpstreamRequestFailed {
            service: service.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            SourceError::SourceUnavailable(_) => StatusCode::NOT_FOUND,
            SourceError::ValidationError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for SourceError {
    fn from(err: rusqlite::Error) -> Self {
        SourceError::QueryFailed(err.to_string())
    }
}

impl IntoResponse for SourceError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "error",
            "message": self.to_string(),
        }));
        (self.status_code(), body).into_response()
    }
}

pub type SourceResult<T> = Result<T, SourceError>;
