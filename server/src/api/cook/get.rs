use super::tracker_error_response;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::progress_store::PgProgressStore;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use hearth_core::{CookView, ProgressTracker};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/cook",
    tag = "cook",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Current cook mode state", body = CookView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_cook_state(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let tracker = ProgressTracker::new(PgProgressStore::new(pool, user.id));
    let now = Utc::now();

    match tracker.resume(user.id, id, now).await {
        Ok(session) => Json(session.view(now)).into_response(),
        Err(e) => tracker_error_response(e),
    }
}
