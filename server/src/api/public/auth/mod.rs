pub mod login;
pub mod signup;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Returned by both signup and login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
