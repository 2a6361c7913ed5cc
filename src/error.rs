//! Error types for the country information service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Maximum number of bytes of an upstream error body kept for diagnostics
pub const BODY_SNIPPET_LIMIT: usize = 500;

// == Upstream Error Enum ==
/// Failure of a single upstream call.
///
/// Scoped to one adapter request; the secondary adapters turn these into
/// in-band error markers instead of propagating them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// Request did not complete within the upstream timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Provider answered with a non-2xx status
    #[error("Upstream returned {status} {status_text}: {body}")]
    Http {
        status: u16,
        status_text: String,
        body: String,
    },

    /// Provider answered 2xx but the body was not the expected JSON
    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    /// Connection-level failure (DNS, TLS, reset...)
    #[error("Transport error: {0}")]
    Transport(String),
}

impl UpstreamError {
    /// Builds an `Http` error, truncating the body to a short snippet.
    pub fn http(status: u16, status_text: impl Into<String>, body: &str) -> Self {
        Self::Http {
            status,
            status_text: status_text.into(),
            body: snippet(body, BODY_SNIPPET_LIMIT).to_string(),
        }
    }

    /// Returns the HTTP status if the provider answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// == App Error Enum ==
/// Errors that abort a whole country lookup.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid inbound input (e.g. blank country name)
    #[error("{0}")]
    Validation(String),

    /// The country provider had no match for the query
    #[error("Country not found: {0}")]
    CountryNotFound(String),

    /// Country resolution failed for a reason other than "no match"
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Anything unexpected on the aggregation path
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::CountryNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the service.
pub type Result<T> = std::result::Result<T, AppError>;

/// Cuts `text` to at most `limit` bytes without splitting a character.
fn snippet(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
