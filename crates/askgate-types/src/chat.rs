//! Chat transcript types.
//!
//! Transcripts are ephemeral, in-process context for the answer generator.
//! They are not an authoritative data store and carry no persistence guarantee.

use serde::{Deserialize, Serialize};

/// One question/answer exchange in a user's transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
}

impl ChatTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Result of a successfully answered question, including updated quota
/// metadata for the caller.
#[derive(Debug, Clone, Serialize)]
pub struct AskOutcome {
    pub question: String,
    pub answer: String,
    pub remaining_questions: crate::user::RemainingQuota,
    pub is_admin: bool,
}
