use crate::error::ShiftError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, error};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl ShiftError {
    pub fn status(&self) -> StatusCode {
        match self {
            ShiftError::InvalidIdentifier(_) | ShiftError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ShiftError::NotReady | ShiftError::StoreUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ShiftError::ProviderRequestFailed(_) => StatusCode::BAD_GATEWAY,
            ShiftError::StoreOperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ShiftError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.is_client_error() {
            debug!(error = %self, "request rejected");
        } else if !matches!(self, ShiftError::NotReady) {
            error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
