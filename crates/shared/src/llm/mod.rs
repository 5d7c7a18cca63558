use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::ConfigError;

pub mod fallback;
pub mod gateway;
pub mod huggingface;
pub mod observability;
pub mod ollama;
pub mod openai;
pub mod prompts;
pub mod resolver;
pub mod tiers;

pub use fallback::{Subject, detect_subject, fallback_response};
pub use gateway::{
    GatewayError, ModelGateway, ModelGatewayFuture, ModelReply, ModelRequest, SamplingParameters,
};
pub use huggingface::{HuggingFaceGateway, HuggingFaceGatewayConfig};
pub use observability::{TierTelemetry, generate_with_telemetry};
pub use ollama::{OllamaGateway, OllamaGatewayConfig};
pub use openai::{OpenAiGateway, OpenAiGatewayConfig};
pub use prompts::TUTOR_SYSTEM_PROMPT;
pub use resolver::{Resolution, ResolutionSource, ResponseResolver};
pub use tiers::{GatewayTier, build_gateways, parse_tiers};

#[derive(Debug, Error)]
pub enum GatewayConfigError {
    #[error(transparent)]
    Env(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to build model http client: {0}")]
    HttpClient(String),
}

fn http_client(timeout: Duration) -> Result<reqwest::Client, GatewayConfigError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| GatewayConfigError::HttpClient(err.to_string()))
}

fn validate_endpoint(key: &str, value: &str) -> Result<(), GatewayConfigError> {
    let parsed = Url::parse(value).map_err(|err| {
        GatewayConfigError::InvalidConfiguration(format!("{key} is not a valid URL: {err}"))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(GatewayConfigError::InvalidConfiguration(format!(
            "{key} must start with http:// or https://"
        ))),
    }
}
