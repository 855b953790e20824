use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::store;
use crate::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub picture_path: Option<String>,
    pub cooking_time: Option<i32>,
    pub estimated_price: Option<f64>,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    responses(
        (status = 200, description = "All recipe summaries, newest first", body = [RecipeSummary]),
        (status = 503, description = "Database not available", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    state.ensure_ready()?;

    let mut conn = state.conn()?;
    let rows = store::list_recipes(&mut conn)?;

    let recipes: Vec<RecipeSummary> = rows
        .into_iter()
        .map(|r| RecipeSummary {
            id: r.id,
            name: r.name,
            picture_path: r.picture_path,
            cooking_time: r.cooking_time,
            estimated_price: r.estimated_price,
            rating: r.rating,
            created_at: r.created_at,
        })
        .collect();

    Ok((StatusCode::OK, Json(recipes)))
}
