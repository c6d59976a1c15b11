pub mod logout;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Authenticated session endpoints. Merged at the root since the path lives
/// next to the public signup and login routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/auth/logout", post(logout::logout))
}

#[derive(OpenApi)]
#[openapi(paths(logout::logout))]
pub struct ApiDoc;
