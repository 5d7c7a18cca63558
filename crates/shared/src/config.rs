use thiserror::Error;

use crate::config_env::{optional_trimmed_env, parse_u64_env};
use crate::llm::{GatewayTier, parse_tiers};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_SESSION_IDLE_TTL_SECONDS: u64 = 3600;
const DEFAULT_GATEWAY_TIERS: &str = "ollama";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub session_idle_ttl_seconds: u64,
    pub gateway_tiers: Vec<GatewayTier>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    MissingVar(String),
    #[error("invalid integer in env var {key}: {value}")]
    ParseInt { key: String, value: String },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_tiers = std::env::var("TUTOR_GATEWAY_TIERS")
            .unwrap_or_else(|_| DEFAULT_GATEWAY_TIERS.to_string());
        let gateway_tiers = parse_tiers(&raw_tiers)
            .map_err(|err| ConfigError::InvalidConfiguration(err.to_string()))?;

        Ok(Self {
            bind_addr: optional_trimmed_env("API_BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            session_idle_ttl_seconds: parse_u64_env(
                "SESSION_IDLE_TTL_SECONDS",
                DEFAULT_SESSION_IDLE_TTL_SECONDS,
            )?,
            gateway_tiers,
        })
    }
}
