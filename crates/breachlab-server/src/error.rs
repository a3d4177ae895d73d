//! Error types for the server crate.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::pages;
use crate::sinks::SinkFault;

/// Errors that can escape a handler.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to start the server.
    #[error("failed to start server: {0}")]
    StartupFailed(String),

    /// A sink operation failed in a way its page does not absorb.
    #[error(transparent)]
    Sink(#[from] SinkFault),

    /// The upload request body could not be read as multipart.
    #[error("invalid upload request: {0}")]
    Multipart(#[from] MultipartError),
}

/// A handler fault paired with the debug flag of the state it escaped
/// from, rendered as the 500 page.
///
/// The flag travels by value from the immutable configuration through
/// [`AppState`](crate::state::AppState); there is no process-wide debug
/// switch.
#[derive(Debug)]
pub struct ErrorPage {
    error: ServerError,
    debug: bool,
}

impl ErrorPage {
    pub fn new(error: impl Into<ServerError>, debug: bool) -> Self {
        Self {
            error: error.into(),
            debug,
        }
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.error, "request failed");

        // VULN #7: with debug mode on, the internal fault text goes
        // straight into the response body.
        let detail = self.debug.then(|| self.error.to_string());

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(pages::server_error_page(detail.as_deref())),
        )
            .into_response()
    }
}
