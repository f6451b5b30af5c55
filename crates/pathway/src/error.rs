//! Error types for discovery, registration and request handling.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::server::LifecycleState;

/// Library error type.
///
/// Discovery errors (`Walk`, `BaseNotFound`, `Load`, `Task`, ...) are fatal
/// and abort startup. `Registration` and `DuplicateTarget` only ever concern
/// a single route; the patcher logs them and moves on.
#[derive(Debug, thiserror::Error)]
pub enum PathwayError {
    /// The routes directory does not exist.
    #[error("Routes directory not found: {0}")]
    BaseNotFound(PathBuf),

    /// The directory tree could not be enumerated.
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A module loader failed on a file it should have been able to read.
    #[error("Failed to load module {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A module exported the wrong handler shape for its target.
    #[error("Module {path} exports {found} handler but target {target} needs {expected}")]
    ExportMismatch {
        path: PathBuf,
        target: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A build task panicked or was cancelled.
    #[error("Route build task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Fewer build tasks were joined than were dispatched.
    #[error("Route build joined {completed} of {dispatched} tasks")]
    Inconsistent { dispatched: usize, completed: usize },

    /// The routing engine refused a route.
    #[error("Failed to register '{target}': {reason}")]
    Registration { target: String, reason: String },

    /// Another route already claimed this target.
    #[error("Target '{0}' is already registered")]
    DuplicateTarget(String),

    /// The listener could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server loop stopped with an I/O error.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),

    /// The server was started twice.
    #[error("Server is already {0}")]
    AlreadyStarted(LifecycleState),
}

/// Error returned by page handlers.
///
/// This is the error value handed to the `_onError` handler. Without one it
/// renders as a plain-text response with its status code.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{status}: {message}")]
pub struct HandlerError {
    pub status: StatusCode,
    pub message: String,
}

impl HandlerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Error passed to the error handler when its own target is requested
    pub(crate) fn direct_request() -> Self {
        Self::internal("error page requested directly")
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Header could not be staged on a request context.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("Invalid header name: {0}")]
    Name(#[from] axum::http::header::InvalidHeaderName),

    #[error("Invalid header value: {0}")]
    Value(#[from] axum::http::header::InvalidHeaderValue),
}
