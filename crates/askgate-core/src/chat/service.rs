//! Ask-flow orchestration.
//!
//! Ordering is: admit check and increment first, then answer generation. A
//! generation failure after admission does NOT refund the consumed quota;
//! this mirrors the product decision recorded in DESIGN.md.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use askgate_types::chat::{AskOutcome, ChatTurn};
use askgate_types::error::{AskError, GenerationError};

use crate::chat::generator::AnswerGenerator;
use crate::chat::log::SessionLog;
use crate::user::policy::today_utc;
use crate::user::repository::UserRecordStore;
use crate::user::service::UserRecordService;

/// Longest accepted question, in characters.
const MAX_QUESTION_CHARS: usize = 1000;

/// Coordinates user admission, transcript context, and answer generation.
pub struct ChatService<S: UserRecordStore, G: AnswerGenerator, L: SessionLog> {
    users: Arc<UserRecordService<S>>,
    generator: G,
    log: L,
    generation_timeout: Duration,
}

impl<S: UserRecordStore, G: AnswerGenerator, L: SessionLog> ChatService<S, G, L> {
    pub fn new(
        users: Arc<UserRecordService<S>>,
        generator: G,
        log: L,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            users,
            generator,
            log,
            generation_timeout,
        }
    }

    /// Answer a question for `email`, consuming one unit of today's quota.
    ///
    /// Steps: validate -> get-or-create -> increment (deny => QuotaExceeded)
    /// -> generate bounded by the configured timeout -> append to transcript
    /// -> report updated remaining quota.
    pub async fn ask(&self, email: &str, question: &str) -> Result<AskOutcome, AskError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AskError::InvalidQuestion(
                "question must not be empty".to_string(),
            ));
        }
        if question.chars().count() > MAX_QUESTION_CHARS {
            return Err(AskError::InvalidQuestion(format!(
                "question exceeds {MAX_QUESTION_CHARS} characters"
            )));
        }

        let record = self.users.get_or_create(email).await?;
        if !self.users.try_increment(&record.email).await? {
            warn!(email = %record.email, "ask denied, daily limit reached");
            return Err(AskError::QuotaExceeded);
        }

        let history = self.log.get(&record.email).await;
        info!(email = %record.email, turns = history.len(), "generating answer");

        let answer = match tokio::time::timeout(
            self.generation_timeout,
            self.generator.generate(question, &history),
        )
        .await
        {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                error!(email = %record.email, error = %e, "answer generation failed");
                return Err(e.into());
            }
            Err(_) => {
                error!(email = %record.email, "answer generation timed out");
                return Err(GenerationError::Timeout.into());
            }
        };

        self.log
            .append(&record.email, ChatTurn::new(question, answer.clone()))
            .await;

        // Re-fetch so the reported remaining quota reflects the increment.
        let refreshed = self.users.get_or_create(&record.email).await?;
        let remaining = self.users.policy().remaining(&refreshed, &today_utc());

        Ok(AskOutcome {
            question: question.to_string(),
            answer,
            remaining_questions: remaining,
            is_admin: refreshed.is_admin,
        })
    }

    /// Drop every user's transcript (global admin operation).
    pub async fn clear_history(&self) {
        self.log.clear_all().await;
        info!("chat history cleared");
    }
}
