use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::gateway::{
    GatewayError, ModelGateway, ModelGatewayFuture, ModelReply, ModelRequest, send_for_body,
};
use super::{GatewayConfigError, http_client, validate_endpoint};
use crate::config_env::{optional_trimmed_env, parse_u64_env, require_non_empty_env};

const DEFAULT_INFERENCE_URL: &str =
    "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2";
const DEFAULT_TIMEOUT_MS: u64 = 60_000;

pub const HUGGINGFACE_GATEWAY_NAME: &str = "huggingface";

#[derive(Debug, Clone)]
pub struct HuggingFaceGatewayConfig {
    pub inference_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
}

impl HuggingFaceGatewayConfig {
    pub fn from_env() -> Result<Self, GatewayConfigError> {
        let api_key = require_non_empty_env("HUGGINGFACE_API_KEY")?;
        let inference_url = optional_trimmed_env("HUGGINGFACE_INFERENCE_URL")
            .unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string());
        validate_endpoint("HUGGINGFACE_INFERENCE_URL", &inference_url)?;

        Ok(Self {
            inference_url,
            api_key,
            timeout_ms: parse_u64_env("HUGGINGFACE_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?,
        })
    }
}

/// Secondary hosted text-generation strategy. Only consulted when listed in
/// the configured tier order.
#[derive(Clone)]
pub struct HuggingFaceGateway {
    client: reqwest::Client,
    config: HuggingFaceGatewayConfig,
}

impl HuggingFaceGateway {
    pub fn new(config: HuggingFaceGatewayConfig) -> Result<Self, GatewayConfigError> {
        let client = http_client(Duration::from_millis(config.timeout_ms))?;
        Ok(Self { client, config })
    }

    async fn send_once(&self, request: &ModelRequest) -> Result<String, GatewayError> {
        let inputs = request.flat_prompt();
        let request_body = InferenceRequest {
            inputs: &inputs,
            parameters: InferenceParameters {
                max_length: request.parameters.max_tokens,
                temperature: request.parameters.temperature,
            },
        };

        let body = send_for_body(
            self.client
                .post(&self.config.inference_url)
                .bearer_auth(&self.config.api_key)
                .json(&request_body),
        )
        .await?;

        let parsed: Vec<GeneratedText> = serde_json::from_str(&body)
            .map_err(|err| GatewayError::Format(format!("response_json_parse_failed: {err}")))?;

        parsed
            .into_iter()
            .next()
            .map(|generated| generated.generated_text)
            .ok_or_else(|| GatewayError::Format("missing_generated_text".to_string()))
    }
}

impl ModelGateway for HuggingFaceGateway {
    fn name(&self) -> &str {
        HUGGINGFACE_GATEWAY_NAME
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
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_length: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}
