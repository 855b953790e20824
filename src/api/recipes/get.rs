use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::store;
use crate::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i32,
    pub name: String,
    pub picture_path: Option<String>,
    pub cooking_time: Option<i32>,
    pub estimated_price: Option<f64>,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ingredients: Vec<IngredientResponse>,
    pub steps: Vec<StepResponse>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientResponse {
    pub name: String,
    pub amount: f64,
    /// Recipe-specific unit when one was given, otherwise the ingredient's
    /// catalog default.
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StepResponse {
    pub step_number: i32,
    pub instruction: String,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe with ingredients and steps", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 503, description = "Database not available", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.ensure_ready()?;

    let mut conn = state.conn()?;
    let detail = store::get_recipe(&mut conn, id)?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

    let response = RecipeResponse {
        id: detail.recipe.id,
        name: detail.recipe.name,
        picture_path: detail.recipe.picture_path,
        cooking_time: detail.recipe.cooking_time,
        estimated_price: detail.recipe.estimated_price,
        rating: detail.recipe.rating,
        created_at: detail.recipe.created_at,
        updated_at: detail.recipe.updated_at,
        ingredients: detail
            .ingredients
            .into_iter()
            .map(|i| IngredientResponse {
                name: i.name,
                amount: i.amount,
                unit: i.unit,
            })
            .collect(),
        steps: detail
            .steps
            .into_iter()
            .map(|s| StepResponse {
                step_number: s.step_number,
                instruction: s.instruction,
            })
            .collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}
