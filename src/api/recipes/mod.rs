pub mod create;
pub mod get;
pub mod list;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

use crate::uploads::MAX_FILE_SIZE;
use crate::AppState;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route("/{id}", get(get::get_recipe))
        // The picture alone may be 5MB; leave headroom for the text fields.
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 64 * 1024))
}

#[derive(OpenApi)]
#[openapi(
    paths(create::create_recipe, list::list_recipes, get::get_recipe),
    components(schemas(
        create::CreateRecipeRequest,
        create::CreateRecipeResponse,
        list::RecipeSummary,
        get::RecipeResponse,
        get::IngredientResponse,
        get::StepResponse,
    ))
)]
pub struct ApiDoc;
