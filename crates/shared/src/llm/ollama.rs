use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::gateway::{
    GatewayError, ModelGateway, ModelGatewayFuture, ModelReply, ModelRequest, send_for_body,
};
use super::{GatewayConfigError, http_client, validate_endpoint};
use crate::config_env::{optional_trimmed_env, parse_u64_env};

const DEFAULT_GENERATE_URL: &str = "http://localhost:11434/api/generate";
const DEFAULT_MODEL: &str = "llama3";
const DEFAULT_TIMEOUT_MS: u64 = 120_000;

pub const OLLAMA_GATEWAY_NAME: &str = "ollama";

#[derive(Debug, Clone)]
pub struct OllamaGatewayConfig {
    pub generate_url: String,
    pub model: String,
    pub timeout_ms: u64,
}

impl OllamaGatewayConfig {
    pub fn from_env() -> Result<Self, GatewayConfigError> {
        let generate_url = optional_trimmed_env("OLLAMA_GENERATE_URL")
            .unwrap_or_else(|| DEFAULT_GENERATE_URL.to_string());
        validate_endpoint("OLLAMA_GENERATE_URL", &generate_url)?;

        Ok(Self {
            generate_url,
            model: optional_trimmed_env("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_ms: parse_u64_env("OLLAMA_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?,
        })
    }
}

/// Local inference strategy. The conversation is flattened into one prompt
/// because `/api/generate` takes plain text rather than chat messages.
#[derive(Clone)]
pub struct OllamaGateway {
    client: reqwest::Client,
    config: OllamaGatewayConfig,
}

impl OllamaGateway {
    pub fn new(config: OllamaGatewayConfig) -> Result<Self, GatewayConfigError> {
        let client = http_client(Duration::from_millis(config.timeout_ms))?;
        Ok(Self { client, config })
    }

    async fn send_once(&self, request: &ModelRequest) -> Result<String, GatewayError> {
        let prompt = request.flat_prompt();
        let request_body = GenerateRequest {
            model: &self.config.model,
            prompt: &prompt,
            stream: false,
        };

        let body = send_for_body(
            self.client
                .post(&self.config.generate_url)
                .json(&request_body),
        )
        .await?;

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|err| GatewayError::Format(format!("response_json_parse_failed: {err}")))?;
        Ok(parsed.response)
    }
}

impl ModelGateway for OllamaGateway {
    fn name(&self) -> &str {
        OLLAMA_GATEWAY_NAME
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
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}
