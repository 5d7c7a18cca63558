use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use shared::conversation_store::{Session, SessionHandle};
use shared::llm::ResolutionSource;
use shared::models::{SendMessageRequest, SendMessageResponse, SessionResponse};
use tracing::info;
use uuid::Uuid;

use super::AppState;
use super::errors::{bad_request_response, session_not_found_response};
use super::observability::{RequestContext, ResolvedBy};

const MAX_MESSAGE_CHARS: usize = 4_000;

pub(super) async fn create_session(State(state): State<AppState>) -> Response {
    let (session_id, handle) = state.conversations.create(Utc::now()).await;
    info!(session_id = %session_id, "chat session created");

    let session = handle.lock().await;
    (StatusCode::CREATED, Json(session_response(&session))).into_response()
}

pub(super) async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let handle = match find_session(&state, &session_id).await {
        Ok(handle) => handle,
        Err(response) => return response,
    };

    let mut session = handle.lock().await;
    session.touch(Utc::now());
    (StatusCode::OK, Json(session_response(&session))).into_response()
}

pub(super) async fn send_message(
    State(state): State<AppState>,
    Extension(request_context): Extension<RequestContext>,
    Path(session_id): Path<String>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = body else {
        return bad_request_response(
            "invalid_message",
            "Request body must be JSON with a string `message` field",
        );
    };
    let message = req.message.trim();
    if message.is_empty() {
        return bad_request_response("invalid_message", "Message must not be empty");
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return bad_request_response(
            "message_too_long",
            "Message must be at most 4000 characters",
        );
    }

    let handle = match find_session(&state, &session_id).await {
        Ok(handle) => handle,
        Err(response) => return response,
    };

    let mut session = handle.lock().await;
    let resolution = state
        .resolver
        .resolve(message, session.conversation.context())
        .await;

    let source_label = match &resolution.source {
        ResolutionSource::Model { gateway } => gateway.as_str(),
        ResolutionSource::Fallback => "fallback",
    };
    info!(
        request_id = %request_context.request_id,
        session_id = %session.id,
        source = source_label,
        "chat turn resolved"
    );

    session
        .conversation
        .record_exchange(message, resolution.text.clone());
    session.touch(Utc::now());

    let resolved_by = ResolvedBy(source_label.to_string());
    let mut response = (
        StatusCode::OK,
        Json(SendMessageResponse {
            session_id: session.id,
            reply: resolution.text,
            source: resolution.source,
            messages: session.conversation.messages().to_vec(),
        }),
    )
        .into_response();
    response.extensions_mut().insert(resolved_by);
    response
}

pub(super) async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let handle = match find_session(&state, &session_id).await {
        Ok(handle) => handle,
        Err(response) => return response,
    };

    let mut session = handle.lock().await;
    session.conversation.reset();
    session.touch(Utc::now());
    info!(session_id = %session.id, "chat session reset");

    (StatusCode::OK, Json(session_response(&session))).into_response()
}

async fn find_session(state: &AppState, raw_session_id: &str) -> Result<SessionHandle, Response> {
    let Ok(session_id) = Uuid::parse_str(raw_session_id.trim()) else {
        return Err(bad_request_response(
            "invalid_session_id",
            "Session id must be a UUID",
        ));
    };

    state
        .conversations
        .get(session_id, Utc::now())
        .await
        .ok_or_else(session_not_found_response)
}

fn session_response(session: &Session) -> SessionResponse {
    SessionResponse {
        session_id: session.id,
        created_at: session.created_at,
        messages: session.conversation.messages().to_vec(),
    }
}
