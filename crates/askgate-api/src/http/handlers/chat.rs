//! Question answering and chat history handlers.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use askgate_types::chat::AskOutcome;

use crate::http::error::AppError;
use crate::http::handlers::MessageResponse;
use crate::state::AppState;

/// Request body for POST /ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub user_email: String,
}

/// POST /ask - Answer a question, charging it against the caller's daily quota.
pub async fn ask(
    State(state): State<AppState>,
    Json(body): Json<AskRequest>,
) -> Result<Json<AskOutcome>, AppError> {
    let outcome = state.chat.ask(&body.user_email, &body.question).await?;
    Ok(Json(outcome))
}

/// GET /clean-chat-history - Drop all in-memory chat history, for every user.
pub async fn clean_chat_history(State(state): State<AppState>) -> Json<MessageResponse> {
    state.chat.clear_history().await;
    Json(MessageResponse::new("Chat history cleaned successfully"))
}
