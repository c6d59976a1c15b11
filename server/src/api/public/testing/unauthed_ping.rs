use axum::{response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Liveness check used by the CLI and deploy scripts.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnauthedPingResponse {
    pub message: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/api/test/unauthed-ping",
    tag = "testing",
    responses(
        (status = 200, description = "Server is up", body = UnauthedPingResponse)
    )
)]
pub async fn unauthed_ping() -> impl IntoResponse {
    Json(UnauthedPingResponse {
        message: "unauthed-ping".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
