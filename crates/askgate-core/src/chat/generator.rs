//! AnswerGenerator trait definition.
//!
//! The opaque answer-generation capability: given a question and the ordered
//! history of prior exchanges, produce an answer string. Retrieval, prompt
//! construction, and model selection are all the implementation's business.
//! Implementations live in askgate-infra (e.g., `OpenAiAnswerGenerator`).

use askgate_types::chat::ChatTurn;
use askgate_types::error::GenerationError;

/// External answer generation seam.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait AnswerGenerator: Send + Sync {
    /// Generate an answer for `question` given the user's prior exchanges.
    fn generate(
        &self,
        question: &str,
        history: &[ChatTurn],
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}
