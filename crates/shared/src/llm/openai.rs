use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::gateway::{
    GatewayError, ModelGateway, ModelGatewayFuture, ModelReply, ModelRequest, send_for_body,
};
use super::{GatewayConfigError, http_client, validate_endpoint};
use crate::config_env::{optional_trimmed_env, parse_u64_env, require_non_empty_env};

const DEFAULT_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TIMEOUT_MS: u64 = 60_000;

pub const OPENAI_GATEWAY_NAME: &str = "openai";

#[derive(Debug, Clone)]
pub struct OpenAiGatewayConfig {
    pub chat_completions_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_ms: u64,
}

impl OpenAiGatewayConfig {
    pub fn from_env() -> Result<Self, GatewayConfigError> {
        let api_key = require_non_empty_env("OPENAI_API_KEY")?;
        let chat_completions_url = optional_trimmed_env("OPENAI_CHAT_COMPLETIONS_URL")
            .unwrap_or_else(|| DEFAULT_CHAT_COMPLETIONS_URL.to_string());
        validate_endpoint("OPENAI_CHAT_COMPLETIONS_URL", &chat_completions_url)?;

        Ok(Self {
            chat_completions_url,
            api_key,
            model: optional_trimmed_env("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_ms: parse_u64_env("OPENAI_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?,
        })
    }
}

/// Hosted chat-completion strategy: one request per turn carrying the system
/// prompt, the prior history and the new user message.
#[derive(Clone)]
pub struct OpenAiGateway {
    client: reqwest::Client,
    config: OpenAiGatewayConfig,
}

impl OpenAiGateway {
    pub fn new(config: OpenAiGatewayConfig) -> Result<Self, GatewayConfigError> {
        let client = http_client(Duration::from_millis(config.timeout_ms))?;
        Ok(Self { client, config })
    }

    async fn send_once(&self, request: &ModelRequest) -> Result<String, GatewayError> {
        let messages = request
            .chat_messages()
            .into_iter()
            .map(|message| ChatMessage {
                role: message.role.as_str(),
                content: message.content,
            })
            .collect::<Vec<_>>();

        let request_body = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: request.parameters.temperature,
            max_tokens: request.parameters.max_tokens,
        };

        let body = send_for_body(
            self.client
                .post(&self.config.chat_completions_url)
                .bearer_auth(&self.config.api_key)
                .json(&request_body),
        )
        .await?;

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|err| GatewayError::Format(format!("response_json_parse_failed: {err}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Format("missing_choice".to_string()))?
            .message
            .content
            .ok_or_else(|| GatewayError::Format("missing_message_content".to_string()))
    }
}

impl ModelGateway for OpenAiGateway {
    fn name(&self) -> &str {
        OPENAI_GATEWAY_NAME
    }

    fn generate<'a>(&'a self, request: ModelRequest) -> ModelGatewayFuture<'a> {
        Box::pin(async move {
            match self.send_once(&request).await {
                Ok(text) => ModelReply::success(text),
                Err(err) => ModelReply::failure(&err),
            }
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
