use std::net::SocketAddr;
use std::sync::Arc;

use api_server::http::{self, AppState};
use shared::config::ApiConfig;
use shared::conversation_store::ConversationStore;
use shared::llm::{ResponseResolver, build_gateways};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        eprintln!("failed to load .env file: {err}");
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "api_server=debug,shared=info,axum=info".to_string()),
        )
        .init();

    let config = match ApiConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("failed to read config: {err}");
            std::process::exit(1);
        }
    };

    let gateways = match build_gateways(&config.gateway_tiers) {
        Ok(gateways) => gateways,
        Err(err) => {
            error!("failed to configure model gateways: {err}");
            std::process::exit(1);
        }
    };
    let resolver = ResponseResolver::new(gateways);
    let tier_names = resolver.tier_names();
    if tier_names.is_empty() {
        warn!("no model gateway tiers configured; every reply will use the rule-based fallback");
    } else {
        info!(tiers = ?tier_names, "model gateway tiers configured");
    }

    let app = http::build_router(AppState {
        resolver: Arc::new(resolver),
        conversations: ConversationStore::new(config.session_idle_ttl_seconds),
    });

    let addr: SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(_) => {
            error!("invalid API_BIND_ADDR: {}", config.bind_addr);
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {addr}: {err}");
            std::process::exit(1);
        }
    };

    info!(
        "tutor server listening on {}",
        listener.local_addr().unwrap_or(addr)
    );
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server exited with error: {err}");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
