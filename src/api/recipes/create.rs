use axum::{
    body::Bytes,
    extract::{
        multipart::{Multipart, MultipartError},
        State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::payload::{self, RecipeForm};
use crate::{store, uploads, AppState};

/// Multipart form accepted by the create endpoint. The `ingredients` and
/// `steps` fields carry JSON-encoded arrays as text.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CreateRecipeRequest {
    pub name: String,
    /// JSON array of `{name, amount, unit}`
    pub ingredients: String,
    /// JSON array of `{instruction}`
    pub steps: String,
    pub cooking_time: Option<String>,
    pub estimated_price: Option<String>,
    pub rating: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub picture: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub message: String,
    pub id: i32,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body(content_type = "multipart/form-data", content = CreateRecipeRequest),
    responses(
        (status = 201, description = "Recipe created successfully", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 503, description = "Database not available", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    state.ensure_ready()?;

    let mut form = RecipeForm::default();
    let mut picture: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "picture" => picture = Some(field.bytes().await.map_err(multipart_error)?),
            "name" => form.name = Some(field.text().await.map_err(multipart_error)?),
            "ingredients" => form.ingredients = Some(field.text().await.map_err(multipart_error)?),
            "steps" => form.steps = Some(field.text().await.map_err(multipart_error)?),
            "cooking_time" => {
                form.cooking_time = Some(field.text().await.map_err(multipart_error)?)
            }
            "estimated_price" => {
                form.estimated_price = Some(field.text().await.map_err(multipart_error)?)
            }
            "rating" => form.rating = Some(field.text().await.map_err(multipart_error)?),
            // Unknown fields are ignored.
            _ => {}
        }
    }

    // All validation happens before any write, file or database.
    let mut data = payload::validate(form).map_err(ApiError::Validation)?;

    if let Some(bytes) = picture.filter(|b| !b.is_empty()) {
        let ext = uploads::validate_picture(&bytes).map_err(ApiError::Validation)?;
        let path = uploads::store_picture(&state.upload_dir, &bytes, ext)
            .await
            .map_err(|e| ApiError::Internal(format!("failed to store picture: {e}")))?;
        data.picture_path = Some(path);
    }

    let mut conn = state.conn()?;
    let id = store::create_recipe(&mut conn, &data)?;

    tracing::info!(recipe_id = id, "recipe created");

    Ok((
        StatusCode::CREATED,
        Json(CreateRecipeResponse {
            message: "Recipe added successfully".to_string(),
            id,
        }),
    ))
}

fn multipart_error(e: MultipartError) -> ApiError {
    tracing::warn!("Multipart read error: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::Validation("File too large. Maximum size is 5MB.".to_string())
    } else {
        ApiError::Validation(format!("Failed to read multipart data: {}", e.body_text()))
    }
}
