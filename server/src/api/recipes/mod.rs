pub mod create;
pub mod get;
pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes).
/// Cook mode routes live under the same prefix.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route("/{id}", get(get::get_recipe))
        .merge(super::cook::router())
}

#[derive(OpenApi)]
#[openapi(
    paths(create::create_recipe, list::list_recipes, get::get_recipe),
    components(schemas(
        create::CreateRecipeResponse,
        hearth_core::NewRecipe,
        hearth_core::NewIngredient,
        hearth_core::NewStep,
        hearth_core::Recipe,
        hearth_core::Ingredient,
        hearth_core::Step,
        list::ListRecipesResponse,
        list::RecipeSummary,
    ))
)]
pub struct ApiDoc;
