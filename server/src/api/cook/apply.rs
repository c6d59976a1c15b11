use super::{cook_error_response, tracker_error_response, CookRejection};
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
use hearth_core::{ActionOutcome, CookAction, CookView, ProgressTracker, SaveStatus};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// A save failure still returns 200; `save` tells the client whether the
/// new state reached the database.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CookActionResponse {
    pub state: CookView,
    #[serde(flatten)]
    pub outcome: ActionOutcome,
    pub save: SaveStatus,
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/cook",
    tag = "cook",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body(content = CookAction, example = json!({"action": "jump_to", "target_index": 2, "confirmed": true})),
    responses(
        (status = 200, description = "Action applied", body = CookActionResponse),
        (status = 400, description = "Unknown ingredient, step or timer", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Blocked by an open gate", body = CookRejection)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn apply_action(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(action): Json<CookAction>,
) -> impl IntoResponse {
    let tracker = ProgressTracker::new(PgProgressStore::new(pool, user.id));
    let now = Utc::now();

    let mut session = match tracker.resume(user.id, id, now).await {
        Ok(s) => s,
        Err(e) => return tracker_error_response(e),
    };

    match tracker.apply(user.id, &mut session, &action, now).await {
        Ok(applied) => Json(CookActionResponse {
            state: session.view(now),
            outcome: applied.outcome,
            save: applied.save,
        })
        .into_response(),
        Err(e) => cook_error_response(e),
    }
}
