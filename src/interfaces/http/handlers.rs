use super::AppState;
use crate::domain::outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::domain::payment::CheckoutResponse;
use crate::error::{Result, ShiftError};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};

pub const LIVENESS_MESSAGE: &str = "Hello World! Server is running...";

type JsonBody = std::result::Result<Json<Value>, JsonRejection>;

fn json_body(body: JsonBody) -> Result<Value> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ShiftError::InvalidBody(rejection.body_text()))
}

pub async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

pub async fn ready(State(state): State<AppState>) -> Response {
    if state.readiness.is_ready() {
        (StatusCode::OK, Json(json!({ "status": "ready" }))).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "starting" })),
        )
            .into_response()
    }
}

pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Value>>> {
    Ok(Json(state.service.list_books().await?))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Value>>> {
    Ok(Json(state.service.get_book(&id).await?))
}

pub async fn list_coverage(State(state): State<AppState>) -> Result<Json<Vec<Value>>> {
    Ok(Json(state.service.list_coverage().await?))
}

#[derive(Debug, Deserialize)]
pub struct ParcelListParams {
    email: Option<String>,
}

pub async fn list_parcels(
    State(state): State<AppState>,
    Query(params): Query<ParcelListParams>,
) -> Result<Json<Vec<Value>>> {
    Ok(Json(
        state
            .service
            .list_parcels(params.email.as_deref())
            .await?,
    ))
}

pub async fn create_parcel(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<InsertOutcome>> {
    let body = json_body(body)?;
    Ok(Json(state.service.create_parcel(body).await?))
}

pub async fn get_parcel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Value>>> {
    Ok(Json(state.service.get_parcel(&id).await?))
}

pub async fn update_parcel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<UpdateOutcome>> {
    let body = json_body(body)?;
    Ok(Json(state.service.update_parcel(&id, body).await?))
}

pub async fn delete_parcel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>> {
    Ok(Json(state.service.delete_parcel(&id).await?))
}

pub async fn create_checkout_session(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<CheckoutResponse>> {
    let body = json_body(body)?;
    Ok(Json(state.service.start_checkout(body).await?))
}
