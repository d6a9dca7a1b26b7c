use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;

use crate::errors::ApiError;
use crate::state::AppState;

/// Body of `POST /status/register`. Fields are optional here so that a
/// missing field is reported as 400 rather than axum's default 422.
#[derive(Debug, Deserialize)]
pub struct RegisterStatusRequest {
    pub key: Option<String>,
    pub value: Option<String>,
}

/// Return the raw stored value as plain text.
#[utoipa::path(
    get,
    path = "/status/{key}",
    tag = "status",
    params(("key" = String, Path, description = "Status key")),
    responses(
        (status = 200, description = "Stored value", body = String, content_type = "text/plain"),
        (status = 400, description = "Empty key", body = crate::openapi::ErrorResponse),
        (status = 404, description = "Key never registered", body = crate::openapi::ErrorResponse),
        (status = 503, description = "Store unreachable or timed out", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn get_status(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<String, ApiError> {
    let entry = state.status.read(&key).await?;
    Ok(entry.value)
}

/// `GET /status/register` shares its path with the register route, so the
/// key `register` is read here.
pub async fn get_register_key(State(state): State<AppState>) -> Result<String, ApiError> {
    let entry = state.status.read("register").await?;
    Ok(entry.value)
}

/// `GET /status/` carries an empty key.
pub async fn get_empty_key() -> ApiError {
    ApiError::bad_request("key must not be empty")
}

/// Register (overwrite) the value for a key.
#[utoipa::path(
    post,
    path = "/status/register",
    tag = "status",
    request_body = crate::openapi::RegisterStatusDoc,
    responses(
        (status = 200, description = "Confirmation message", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing or invalid field", body = crate::openapi::ErrorResponse),
        (status = 503, description = "Store unreachable or timed out", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn register_status(
    State(state): State<AppState>,
    payload: Result<Json<RegisterStatusRequest>, JsonRejection>,
) -> Result<String, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let key = req.key.ok_or_else(|| ApiError::bad_request("missing field `key`"))?;
    let value = req.value.ok_or_else(|| ApiError::bad_request("missing field `value`"))?;
    let message = state.status.write(&key, &value).await?;
    Ok(message)
}
