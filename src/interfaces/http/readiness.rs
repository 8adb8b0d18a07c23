use super::AppState;
use crate::error::ShiftError;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Rejects requests with `503 not_ready` until the store has been reached.
pub async fn require_ready(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.readiness.is_ready() {
        next.run(request).await
    } else {
        ShiftError::NotReady.into_response()
    }
}
