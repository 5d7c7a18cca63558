use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use super::prompts::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, TUTOR_SYSTEM_PROMPT};
use crate::conversation::Message;

pub type ModelGatewayFuture<'a> = Pin<Box<dyn Future<Output = ModelReply> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParameters {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for SamplingParameters {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system_prompt: String,
    pub history: Vec<Message>,
    pub new_input: String,
    pub parameters: SamplingParameters,
}

impl ModelRequest {
    pub fn new(new_input: impl Into<String>, history: &[Message]) -> Self {
        Self {
            system_prompt: TUTOR_SYSTEM_PROMPT.to_string(),
            history: history.to_vec(),
            new_input: new_input.into(),
            parameters: SamplingParameters::default(),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// System prompt, prior history and the new user turn, in send order.
    pub fn chat_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(Message::system(self.system_prompt.clone()));
        messages.extend(self.history.iter().cloned());
        messages.push(Message::user(self.new_input.clone()));
        messages
    }

    /// Single text prompt with one role-prefixed block per message, ending
    /// with an open assistant turn.
    pub fn flat_prompt(&self) -> String {
        let mut prompt = String::new();
        for message in self.chat_messages() {
            prompt.push_str(message.role.transcript_label());
            prompt.push_str(": ");
            prompt.push_str(message.content.trim());
            prompt.push_str("\n\n");
        }
        prompt.push_str("Assistant:");
        prompt
    }
}

/// Outcome of one gateway attempt. Failures are logged once, by the
/// per-tier telemetry, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub text: String,
    pub succeeded: bool,
    pub error_type: Option<&'static str>,
    pub error_detail: Option<String>,
}

impl ModelReply {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            succeeded: true,
            error_type: None,
            error_detail: None,
        }
    }

    pub fn failure(err: &GatewayError) -> Self {
        Self {
            text: String::new(),
            succeeded: false,
            error_type: Some(err.error_type()),
            error_detail: Some(err.to_string()),
        }
    }

    /// A successful reply with no visible text is downgraded to a format
    /// failure so it never reaches the conversation.
    pub fn reject_blank(self) -> Self {
        if self.succeeded && self.text.trim().is_empty() {
            Self::failure(&GatewayError::Format("empty_reply".to_string()))
        } else {
            self
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("model provider unreachable: {0}")]
    Transport(String),
    #[error("model provider request timed out")]
    Timeout,
    #[error("model provider returned status {status}: {body}")]
    Protocol { status: u16, body: String },
    #[error("model provider returned an invalid payload: {0}")]
    Format(String),
}

impl GatewayError {
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Timeout => "timeout",
            Self::Protocol { .. } => "protocol",
            Self::Format(_) => "format",
        }
    }

    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}

pub trait ModelGateway: Send + Sync {
    fn name(&self) -> &str;

    fn generate<'a>(&'a self, request: ModelRequest) -> ModelGatewayFuture<'a>;
}

const MAX_ERROR_BODY_CHARS: usize = 512;

/// Sends a prepared request and returns the body of a 2xx response.
pub(crate) async fn send_for_body(request: reqwest::RequestBuilder) -> Result<String, GatewayError> {
    let response = request.send().await.map_err(GatewayError::from_send)?;
    let status = response.status();
    let body = response.text().await.map_err(GatewayError::from_send)?;

    if !status.is_success() {
        return Err(GatewayError::Protocol {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    Ok(body)
}
