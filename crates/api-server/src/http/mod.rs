use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Router, middleware};
use shared::conversation_store::ConversationStore;
use shared::llm::ResponseResolver;

mod chat;
mod errors;
mod health;
mod observability;
mod page;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ResponseResolver>,
    pub conversations: ConversationStore,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/healthz", get(health::healthz))
        .route("/v1/sessions", post(chat::create_session))
        .route("/v1/sessions/{session_id}", get(chat::get_session))
        .route(
            "/v1/sessions/{session_id}/messages",
            post(chat::send_message),
        )
        .route("/v1/sessions/{session_id}/reset", post(chat::reset_session))
        .layer(middleware::from_fn(
            observability::request_observability_middleware,
        ))
        .with_state(app_state)
}
