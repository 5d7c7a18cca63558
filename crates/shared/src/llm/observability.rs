use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::gateway::{ModelGateway, ModelReply, ModelRequest};

#[derive(Debug, Clone)]
pub struct TierTelemetry {
    pub gateway: String,
    pub outcome: &'static str,
    pub latency_ms: u64,
    pub reply_chars: usize,
    pub error_type: Option<&'static str>,
    pub error_detail: Option<String>,
}

/// Runs one tier attempt and emits its `model_tier_attempt` event. Blank
/// replies are rejected before the event is recorded.
pub async fn generate_with_telemetry(
    gateway: &dyn ModelGateway,
    request: ModelRequest,
) -> (ModelReply, TierTelemetry) {
    let started_at = Instant::now();
    let reply = gateway.generate(request).await.reject_blank();
    let telemetry = telemetry_for_reply(gateway.name(), started_at.elapsed(), &reply);
    log_tier_telemetry(&telemetry);
    (reply, telemetry)
}

fn telemetry_for_reply(gateway: &str, latency: Duration, reply: &ModelReply) -> TierTelemetry {
    TierTelemetry {
        gateway: gateway.to_string(),
        outcome: if reply.succeeded { "success" } else { "failure" },
        latency_ms: duration_to_millis(latency),
        reply_chars: reply.text.chars().count(),
        error_type: reply.error_type,
        error_detail: reply.error_detail.clone(),
    }
}

fn log_tier_telemetry(telemetry: &TierTelemetry) {
    if telemetry.outcome == "success" {
        info!(
            gateway = %telemetry.gateway,
            outcome = telemetry.outcome,
            latency_ms = telemetry.latency_ms,
            reply_chars = telemetry.reply_chars,
            metric_name = "model_tier_attempt",
            "model tier attempt metrics"
        );
    } else {
        warn!(
            gateway = %telemetry.gateway,
            outcome = telemetry.outcome,
            latency_ms = telemetry.latency_ms,
            error_type = telemetry.error_type.unwrap_or("unknown"),
            error_detail = telemetry.error_detail.as_deref().unwrap_or("unknown"),
            metric_name = "model_tier_attempt",
            "model tier attempt failed"
        );
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    duration.as_millis().min(u64::MAX as u128) as u64
}
