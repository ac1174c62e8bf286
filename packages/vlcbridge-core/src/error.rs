//! Centralized error types for the vlcbridge core library.
//!
//! Every failure while relaying a request is a [`RelayError`]. The HTTP
//! layer wraps it in a [`FailedRequest`] at a single boundary point, which
//! renders the generic `404 Not Found` response remote control clients
//! expect. Details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::player::{PlayerApiError, StatusDocumentError};
use crate::services::SupervisorError;

/// Errors that can occur while relaying a request to the player.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The player could not be launched.
    #[error("Player launch failed: {0}")]
    Supervisor(#[from] SupervisorError),

    /// The player control API call failed (connection refused, reset, ...).
    #[error("Player API request failed: {0}")]
    PlayerApi(#[from] PlayerApiError),

    /// The status document could not be patched.
    #[error("Status document rewrite failed: {0}")]
    StatusDocument(#[from] StatusDocumentError),
}

impl RelayError {
    /// Returns a machine-readable error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Supervisor(_) => "player_launch_failed",
            Self::PlayerApi(_) => "player_api_failed",
            Self::StatusDocument(_) => "status_document_invalid",
        }
    }
}

/// Convenient Result alias for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

/// A relay failure bound to the request target that caused it.
#[derive(Debug)]
pub struct FailedRequest {
    /// Path and query string of the failed request.
    pub target: String,
    /// Underlying failure.
    pub error: RelayError,
}

impl FailedRequest {
    pub fn new(target: impl Into<String>, error: RelayError) -> Self {
        Self {
            target: target.into(),
            error,
        }
    }

    /// Status line sent for every relay failure.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::NOT_FOUND
    }

    /// Diagnostic message returned to the caller.
    pub fn message(&self) -> String {
        format!("File Not Found: {}", self.target)
    }
}

impl IntoResponse for FailedRequest {
    fn into_response(self) -> Response {
        log::warn!(
            "[Relay] {} failed ({}), replying {}",
            self.target,
            self.error.code(),
            self.status_code()
        );
        log::debug!("[Relay] {} failure detail: {:?}", self.target, self.error);

        (self.status_code(), self.message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_request_maps_to_not_found() {
        let err = FailedRequest::new(
            "/requests/status.xml?command=pl_play",
            RelayError::StatusDocument(StatusDocumentError::MissingRoot),
        );
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.message(),
            "File Not Found: /requests/status.xml?command=pl_play"
        );
        assert_eq!(
            err.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn relay_error_codes() {
        let err = RelayError::StatusDocument(StatusDocumentError::UnclosedRoot);
        assert_eq!(err.code(), "status_document_invalid");
    }
}
