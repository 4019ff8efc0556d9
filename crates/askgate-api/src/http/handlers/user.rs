//! User status and quota administration handlers.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::info;

use askgate_types::user::UserStatus;

use crate::http::error::AppError;
use crate::http::handlers::MessageResponse;
use crate::state::AppState;

/// Query parameters for GET /user-status.
#[derive(Debug, Deserialize)]
pub struct UserStatusQuery {
    pub user_email: String,
}

/// GET /user-status - Report today's usage and remaining quota for a user.
///
/// Provisions the user on first contact, same as asking a question would.
pub async fn user_status(
    State(state): State<AppState>,
    Query(query): Query<UserStatusQuery>,
) -> Result<Json<UserStatus>, AppError> {
    let status = state.users.status(&query.user_email).await?;
    Ok(Json(status))
}

/// Request body for POST /reset-daily-count.
#[derive(Debug, Deserialize)]
pub struct ResetDailyCountRequest {
    pub user_email: String,
}

/// POST /reset-daily-count - Reset today's question count. Admin only.
pub async fn reset_daily_count(
    State(state): State<AppState>,
    Json(body): Json<ResetDailyCountRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let reset = state.users.reset_today(&body.user_email).await?;
    if !reset {
        return Err(AppError::NotAdmin);
    }
    info!(email = %body.user_email, "daily count reset");
    Ok(Json(MessageResponse::new("Daily count reset successfully")))
}
