use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::gateway::ModelGateway;
use super::huggingface::{HUGGINGFACE_GATEWAY_NAME, HuggingFaceGateway, HuggingFaceGatewayConfig};
use super::ollama::{OLLAMA_GATEWAY_NAME, OllamaGateway, OllamaGatewayConfig};
use super::openai::{OPENAI_GATEWAY_NAME, OpenAiGateway, OpenAiGatewayConfig};
use super::GatewayConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayTier {
    OpenAi,
    Ollama,
    HuggingFace,
}

impl GatewayTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => OPENAI_GATEWAY_NAME,
            Self::Ollama => OLLAMA_GATEWAY_NAME,
            Self::HuggingFace => HUGGINGFACE_GATEWAY_NAME,
        }
    }
}

impl fmt::Display for GatewayTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GatewayTier {
    type Err = GatewayConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            OPENAI_GATEWAY_NAME => Ok(Self::OpenAi),
            OLLAMA_GATEWAY_NAME => Ok(Self::Ollama),
            HUGGINGFACE_GATEWAY_NAME => Ok(Self::HuggingFace),
            other => Err(GatewayConfigError::InvalidConfiguration(format!(
                "unknown model gateway tier '{other}'"
            ))),
        }
    }
}

/// Parses a comma-separated tier list. Order is preserved and duplicates are
/// rejected; an empty list means fallback-only.
pub fn parse_tiers(raw: &str) -> Result<Vec<GatewayTier>, GatewayConfigError> {
    let mut tiers = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let tier = item.parse::<GatewayTier>()?;
        if tiers.contains(&tier) {
            return Err(GatewayConfigError::InvalidConfiguration(format!(
                "model gateway tier '{tier}' listed more than once"
            )));
        }
        tiers.push(tier);
    }
    Ok(tiers)
}

/// Builds one gateway per tier from its environment configuration.
pub fn build_gateways(
    tiers: &[GatewayTier],
) -> Result<Vec<Arc<dyn ModelGateway>>, GatewayConfigError> {
    tiers
        .iter()
        .map(|tier| -> Result<Arc<dyn ModelGateway>, GatewayConfigError> {
            let gateway: Arc<dyn ModelGateway> = match tier {
                GatewayTier::OpenAi => {
                    Arc::new(OpenAiGateway::new(OpenAiGatewayConfig::from_env()?)?)
                }
                GatewayTier::Ollama => {
                    Arc::new(OllamaGateway::new(OllamaGatewayConfig::from_env()?)?)
                }
                GatewayTier::HuggingFace => Arc::new(HuggingFaceGateway::new(
                    HuggingFaceGatewayConfig::from_env()?,
                )?),
            };
            Ok(gateway)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{GatewayTier, parse_tiers};

    #[test]
    fn parse_tiers_preserves_configured_order() {
        let tiers = parse_tiers(" Ollama, openai ,huggingface").expect("tiers should parse");
        assert_eq!(
            tiers,
            vec![
                GatewayTier::Ollama,
                GatewayTier::OpenAi,
                GatewayTier::HuggingFace
            ]
        );
    }

    #[test]
    fn parse_tiers_allows_fallback_only() {
        assert!(parse_tiers("").expect("empty list should parse").is_empty());
        assert!(parse_tiers(" , ").expect("blank items should parse").is_empty());
    }

    #[test]
    fn parse_tiers_rejects_unknown_and_duplicate_names() {
        let unknown = parse_tiers("ollama,gemini").expect_err("unknown tier should fail");
        assert!(unknown.to_string().contains("unknown model gateway tier 'gemini'"));

        let duplicate = parse_tiers("ollama,OLLAMA").expect_err("duplicate tier should fail");
        assert!(duplicate.to_string().contains("listed more than once"));
    }
}
