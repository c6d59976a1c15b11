pub mod apply;
pub mod get;

use crate::api::ErrorResponse;
use crate::AppState;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use hearth_core::{CookError, TrackerError};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Cook mode routes, merged into the recipes router.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/cook", get(get::get_cook_state).post(apply::apply_action))
}

/// Body of a 409: the action was understood but a gate blocked it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CookRejection {
    pub error: String,
    /// Repeating the action with `confirmed: true` would succeed
    pub confirmation_required: bool,
}

pub(crate) fn cook_error_response(e: CookError) -> Response {
    if e.is_rejection() {
        let confirmation_required = matches!(
            e,
            CookError::ConfirmationRequired { .. } | CookError::RestartRequiresConfirmation
        );
        return (
            StatusCode::CONFLICT,
            Json(CookRejection {
                error: e.to_string(),
                confirmation_required,
            }),
        )
            .into_response();
    }

    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

pub(crate) fn tracker_error_response(e: TrackerError) -> Response {
    match e {
        TrackerError::RecipeNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe not found".to_string(),
            }),
        )
            .into_response(),
        TrackerError::Cook(e) => cook_error_response(e),
        TrackerError::Store(e) => {
            tracing::error!("Failed to load cook session: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to load cook progress".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(get::get_cook_state, apply::apply_action),
    components(schemas(
        apply::CookActionResponse,
        CookRejection,
        hearth_core::CookAction,
        hearth_core::ActionOutcome,
        hearth_core::Transition,
        hearth_core::CookPosition,
        hearth_core::SaveStatus,
        hearth_core::CookView,
        hearth_core::IngredientView,
        hearth_core::StepView,
        hearth_core::TimerView,
        hearth_core::TimerStatus,
        hearth_core::CelebrationView,
    ))
)]
pub struct ApiDoc;
