use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::RecipeRow;
use crate::schema::recipes;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub ingredient_count: usize,
    pub step_count: usize,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
}

fn json_len(value: &serde_json::Value) -> usize {
    value.as_array().map(Vec::len).unwrap_or(0)
}

impl From<RecipeRow> for RecipeSummary {
    fn from(row: RecipeRow) -> Self {
        Self {
            ingredient_count: json_len(&row.ingredients),
            step_count: json_len(&row.steps),
            id: row.id,
            title: row.title,
            updated_at: row.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    responses(
        (status = 200, description = "Recipes owned by the caller, newest first", body = ListRecipesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_recipes(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<RecipeRow> = match recipes::table
        .filter(recipes::user_id.eq(user.id))
        .filter(recipes::deleted_at.is_null())
        .order(recipes::updated_at.desc())
        .select(RecipeRow::as_select())
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to list recipes: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipes".to_string(),
                }),
            )
                .into_response();
        }
    };

    Json(ListRecipesResponse {
        recipes: rows.into_iter().map(RecipeSummary::from).collect(),
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_counts_json_arrays() {
        let now = Utc::now();
        let row = RecipeRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Toast".to_string(),
            ingredients: json!([{"id": "bread", "item": "bread"}]),
            steps: json!(null),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let summary = RecipeSummary::from(row);
        assert_eq!(summary.ingredient_count, 1);
        assert_eq!(summary.step_count, 0);
    }
}
