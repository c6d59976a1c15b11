use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewRecipeRow;
use crate::schema::recipes;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use hearth_core::NewRecipe;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = NewRecipe,
    responses(
        (status = 201, description = "Recipe created successfully", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<NewRecipe>,
) -> impl IntoResponse {
    // Recipes are validated once, here; everything downstream trusts them
    let recipe = match request.into_recipe(Uuid::new_v4()) {
        Ok(r) => r,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    };

    let (ingredients, steps) = match (
        serde_json::to_value(&recipe.ingredients),
        serde_json::to_value(&recipe.steps),
    ) {
        (Ok(i), Ok(s)) => (i, s),
        _ => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to encode recipe".to_string(),
                }),
            )
                .into_response()
        }
    };

    let mut conn = get_conn!(pool);

    let row = NewRecipeRow {
        id: recipe.id,
        user_id: user.id,
        title: &recipe.title,
        ingredients,
        steps,
    };

    match diesel::insert_into(recipes::table)
        .values(&row)
        .execute(&mut conn)
    {
        Ok(_) => {
            tracing::info!(recipe_id = %recipe.id, "recipe created");
            (
                StatusCode::CREATED,
                Json(CreateRecipeResponse { id: recipe.id }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}
