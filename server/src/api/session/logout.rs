use crate::api::ErrorResponse;
use crate::auth::{bearer_token, delete_session, AuthUser};
use crate::db::DbPool;
use crate::get_conn;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    // The extractor already validated the header
    let token = match bearer_token(&headers) {
        Ok(t) => t,
        Err(e) => return e.into_response(),
    };

    let mut conn = get_conn!(pool);

    match delete_session(&mut conn, token) {
        Ok(_) => {
            tracing::info!(user_id = %user.id, "user logged out");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            tracing::error!("Failed to delete session: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to log out".to_string(),
                }),
            )
                .into_response()
        }
    }
}
