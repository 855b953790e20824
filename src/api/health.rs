use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::{AppState, DbState};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database not available", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.db_state != DbState::Ready {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "Database not initialized".to_string(),
                database: None,
            }),
        );
    }

    let connected = state
        .pool
        .get()
        .ok()
        .map(|mut conn| diesel::sql_query("SELECT 1").execute(&mut conn).is_ok())
        .unwrap_or(false);

    if connected {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "OK".to_string(),
                database: Some("Connected".to_string()),
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "Database unreachable".to_string(),
                database: Some("Disconnected".to_string()),
            }),
        )
    }
}

#[derive(OpenApi)]
#[openapi(paths(health), components(schemas(HealthResponse)))]
pub struct ApiDoc;
