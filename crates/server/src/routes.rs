pub mod status;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Readiness: the store answered a ping within the store timeout.
#[utoipa::path(get, path = "/ready", tag = "health", responses((status = 200, description = "Store reachable", body = crate::openapi::HealthResponse), (status = 503, description = "Store unreachable", body = crate::openapi::HealthResponse)))]
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    match state.status.ping().await {
        Ok(()) => (StatusCode::OK, Json(Health::ok())),
        Err(e) => {
            warn!(backend = state.status.backend(), error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(Health::unavailable()))
        }
    }
}

pub async fn metrics() -> (StatusCode, String) {
    match service::metrics::encode_metrics() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}")),
    }
}

/// Build the full application router: status API, health, metrics and docs
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/status/register", get(status::get_register_key).post(status::register_status))
        .route("/status/", get(status::get_empty_key))
        .route("/status/:key", get(status::get_status));

    let ops = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics));

    api.merge(ops)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx responses are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
