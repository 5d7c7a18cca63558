use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::fallback::fallback_response;
use super::gateway::{ModelGateway, ModelRequest};
use super::observability::generate_with_telemetry;
use crate::conversation::Message;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionSource {
    Model { gateway: String },
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub source: ResolutionSource,
}

/// Tries each configured model tier once, in order, and answers with the
/// first successful reply. When every tier fails the rule-based fallback
/// answers instead, so resolution never fails.
///
/// Success is read from [`ModelReply::succeeded`](super::ModelReply) only; the
/// reply text is never inspected for failure wording. Blank replies count as
/// failures.
#[derive(Clone)]
pub struct ResponseResolver {
    tiers: Vec<Arc<dyn ModelGateway>>,
}

impl ResponseResolver {
    pub fn new(tiers: Vec<Arc<dyn ModelGateway>>) -> Self {
        Self { tiers }
    }

    pub fn fallback_only() -> Self {
        Self { tiers: Vec::new() }
    }

    pub fn tier_names(&self) -> Vec<String> {
        self.tiers
            .iter()
            .map(|gateway| gateway.name().to_string())
            .collect()
    }

    pub async fn resolve(&self, new_input: &str, history: &[Message]) -> Resolution {
        for gateway in &self.tiers {
            let request = ModelRequest::new(new_input, history);
            let (reply, _) = generate_with_telemetry(gateway.as_ref(), request).await;

            if !reply.succeeded {
                continue;
            }

            return Resolution {
                text: reply.text,
                source: ResolutionSource::Model {
                    gateway: gateway.name().to_string(),
                },
            };
        }

        info!(
            tiers_attempted = self.tiers.len(),
            "answering with rule-based fallback"
        );
        Resolution {
            text: fallback_response(new_input),
            source: ResolutionSource::Fallback,
        }
    }
}
