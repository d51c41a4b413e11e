//! OpenAI-compatible chat-completion client.

use crate::client::OutboundClient;
use crate::config::LlmConfig;
use crate::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Builds the conversation every stage sends: one system message, then one user message.
pub fn conversation(system: &str, user: impl Into<String>) -> Vec<ChatMessage> {
    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
}

/// Plan stage sampling.
pub const REASONING_SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.7,
    max_tokens: Some(1024),
    top_p: Some(1.0),
};

/// Write stage sampling.
pub const GENERATION_SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.85,
    max_tokens: Some(4096),
    top_p: Some(1.0),
};

/// Retrieval-augmented answer sampling. No token cap.
pub const ANSWER_SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.7,
    max_tokens: None,
    top_p: None,
};

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Clone)]
pub struct ChatClient {
    client: OutboundClient,
    config: LlmConfig,
}

impl ChatClient {
    pub fn new(client: OutboundClient, config: LlmConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Sends `messages` to `model` and returns the first choice's content.
    pub async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        sampling: SamplingParams,
    ) -> GatewayResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GatewayError::Config("GROQ_API_KEY is not set".to_string()))?;

        let url = self.config.chat_completions_url();
        log::debug!("chat completion with {} ({} messages)", model, messages.len());
        let request = ChatRequest {
            model,
            messages,
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            top_p: sampling.top_p,
        };
        let body = self
            .client
            .post_json_bearer(&url, &request, api_key.trim())
            .await?;
        let parsed: ChatResponse =
            serde_json::from_slice(&body).map_err(|source| GatewayError::Decode {
                context: "failed to decode chat completion",
                source,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GatewayError::upstream(url, format!("no choices returned by {}", model)))
    }
}
