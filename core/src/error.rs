//! Error taxonomy for the Leat API client.
//!
//! # Design
//! Every failure collapses into one of four kinds. `AuthNotConfigured` is
//! raised locally before any network call. `MaintenanceMode` is split out
//! from `RequestFailed` so callers can schedule a later attempt instead of
//! reporting a hard failure. Nothing is retried or swallowed here.

use serde_json::Value;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Plain tag for an `ApiError`, for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AuthNotConfigured,
    MaintenanceMode,
    MalformedResponse,
    RequestFailed,
}

/// Errors returned by `ApiClient`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// `request` was called before an `Authorization` header was set.
    #[error("no Authorization header configured; authenticate before calling the API")]
    AuthNotConfigured,

    /// The API answered with its maintenance signal.
    #[error("the API is in maintenance mode: {message}")]
    MaintenanceMode { message: String },

    /// The body was not JSON, or lacked a required field such as `data`.
    #[error("malformed response: {message}")]
    MalformedResponse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Any other non-2xx status or transport failure.
    ///
    /// `status` is `None` when no response was received at all.
    #[error("{}", request_failed_message(.status, .message))]
    RequestFailed {
        status: Option<u16>,
        message: String,
        code: Option<i64>,
        errors: Option<Value>,
    },
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::AuthNotConfigured => ErrorKind::AuthNotConfigured,
            ApiError::MaintenanceMode { .. } => ErrorKind::MaintenanceMode,
            ApiError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            ApiError::RequestFailed { .. } => ErrorKind::RequestFailed,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        ApiError::MalformedResponse {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn invalid_json(error: serde_json::Error) -> Self {
        ApiError::MalformedResponse {
            message: format!("body is not valid JSON: {error}"),
            source: Some(error),
        }
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }
}

fn request_failed_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("request failed with HTTP {status}: {message}"),
        None => format!("request failed: {message}"),
    }
}
