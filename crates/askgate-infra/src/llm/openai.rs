//! OpenAI-compatible answer generator.
//!
//! Implements the `AnswerGenerator` seam over any endpoint that speaks the
//! OpenAI chat completions protocol, via a configurable base URL. The user's
//! transcript is replayed as alternating user/assistant turns so the model
//! answers in conversation context.
//!
//! Uses [`async_openai`] for type-safe request/response handling.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use secrecy::{ExposeSecret, SecretString};

use askgate_core::chat::generator::AnswerGenerator;
use askgate_types::chat::ChatTurn;
use askgate_types::config::LlmConfig;
use askgate_types::error::GenerationError;

const SYSTEM_PROMPT: &str = "You are a helpful assistant answering questions about the \
    documentation you were trained on. Use the conversation so far as context. \
    If you do not know the answer, say so.";

/// Answer generator speaking the OpenAI chat completions protocol.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`.
pub struct OpenAiAnswerGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiAnswerGenerator {
    /// Create a generator from the LLM configuration and API key.
    pub fn new(api_key: &SecretString, config: &LlmConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    /// Build a chat completion request: system prompt, then the transcript
    /// as user/assistant pairs, then the new question.
    fn build_request(&self, question: &str, history: &[ChatTurn]) -> CreateChatCompletionRequest {
        let mut messages: Vec<ChatCompletionRequestMessage> =
            Vec::with_capacity(history.len() * 2 + 2);

        messages.push(ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(
                    SYSTEM_PROMPT.to_string(),
                ),
                name: None,
            },
        ));

        for turn in history {
            messages.push(ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(turn.question.clone()),
                    name: None,
                },
            ));
            #[allow(deprecated)]
            messages.push(ChatCompletionRequestMessage::Assistant(
                ChatCompletionRequestAssistantMessage {
                    content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                        turn.answer.clone(),
                    )),
                    refusal: None,
                    name: None,
                    audio: None,
                    tool_calls: None,
                    function_call: None,
                },
            ));
        }

        messages.push(ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(question.to_string()),
                name: None,
            },
        ));

        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(self.temperature),
            ..Default::default()
        }
    }
}

impl AnswerGenerator for OpenAiAnswerGenerator {
    async fn generate(
        &self,
        question: &str,
        history: &[ChatTurn],
    ) -> Result<String, GenerationError> {
        let request = self.build_request(question, history);

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        if answer.trim().is_empty() {
            return Err(GenerationError::EmptyAnswer);
        }

        Ok(answer)
    }
}

/// Map an `async_openai::error::OpenAIError` to a [`GenerationError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> GenerationError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => GenerationError::Provider(api_err.message.clone()),
        other => GenerationError::Provider(other.to_string()),
    }
}
