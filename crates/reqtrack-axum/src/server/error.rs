//! Error types for the HTTP service.
//!
//! [`Error`] covers every failure a handler can report and implements
//! [`IntoResponse`] so handlers can return it directly. Unknown identifiers
//! are not errors for query and complete; only the detail endpoint reports
//! [`Error::NotFound`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The registry failed (identifier space exhausted).
    #[error("Registry error: {0}")]
    Registry(#[from] reqtrack::Error),

    /// A worker channel was closed.
    #[error("Channel error: {context}")]
    ChannelError { context: String },

    /// The request body could not be decoded.
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// No entry exists for the identifier.
    #[error("Request {id} not found")]
    NotFound { id: String },

    /// The service is in the process of shutting down.
    #[error("Service is shutting down")]
    ServiceShutdown,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Registry(_) | Self::ChannelError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ServiceShutdown => StatusCode::SERVICE_UNAVAILABLE,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("{self}");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
