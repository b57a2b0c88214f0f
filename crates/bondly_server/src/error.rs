//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bondly_turns::{StoreError, TurnError};
use derive_more::{Display, Error, From};
use tracing::{error, instrument};

use crate::api::ErrorBody;

/// Error returned by API handlers.
#[derive(Debug, Display, Error, From)]
pub enum ApiError {
    /// A submission was rejected or the store failed while submitting.
    #[display("{}", _0)]
    Turn(TurnError),
    /// The store failed while reading.
    #[display("{}", _0)]
    Store(StoreError),
    /// A blocking task could not complete.
    #[display("Internal error: {}", _0)]
    #[from(ignore)]
    Internal(#[error(not(source))] String),
}

impl ApiError {
    /// Stable tag reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Turn(err) => err.kind(),
            ApiError::Store(_) => "Storage",
            ApiError::Internal(_) => "Internal",
        }
    }

    /// HTTP status for this error.
    #[instrument(skip(self))]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Turn(TurnError::InvalidSender(_) | TurnError::EmptyText) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Turn(TurnError::OutOfTurn { .. }) => StatusCode::CONFLICT,
            ApiError::Turn(TurnError::Storage(_)) | ApiError::Store(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        let body = ErrorBody::new(self.kind().to_string(), self.to_string());
        (status, Json(body)).into_response()
    }
}
