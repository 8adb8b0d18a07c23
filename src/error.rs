use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShiftError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Store operation failed: {0}")]
    StoreOperationFailed(String),
    #[error("Payment provider request failed: {0}")]
    ProviderRequestFailed(String),
    #[error("Service is not ready")]
    NotReady,
}

impl ShiftError {
    /// Stable machine-readable code used in error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ShiftError::InvalidIdentifier(_) => "invalid_identifier",
            ShiftError::InvalidBody(_) => "invalid_body",
            ShiftError::StoreUnavailable(_) => "store_unavailable",
            ShiftError::StoreOperationFailed(_) => "store_operation_failed",
            ShiftError::ProviderRequestFailed(_) => "provider_request_failed",
            ShiftError::NotReady => "not_ready",
        }
    }

    /// Whether the failure was caused by the caller rather than a dependency.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ShiftError::InvalidIdentifier(_) | ShiftError::InvalidBody(_)
        )
    }
}

impl From<bson::ser::Error> for ShiftError {
    fn from(err: bson::ser::Error) -> Self {
        ShiftError::InvalidBody(err.to_string())
    }
}

impl From<reqwest::Error> for ShiftError {
    fn from(err: reqwest::Error) -> Self {
        ShiftError::ProviderRequestFailed(err.to_string())
    }
}

#[cfg(feature = "storage-mongodb")]
impl From<mongodb::error::Error> for ShiftError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. } => {
                ShiftError::StoreUnavailable(err.to_string())
            }
            _ => ShiftError::StoreOperationFailed(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShiftError>;
