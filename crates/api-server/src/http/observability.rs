use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};
use uuid::Uuid;

static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
const MAX_REQUEST_ID_LEN: usize = 128;
const SESSION_ID_SEGMENT: &str = "{session_id}";

#[derive(Clone, Debug)]
pub(super) struct RequestContext {
    pub(super) request_id: String,
}

/// Set on a chat turn response so the request log names who answered.
#[derive(Clone, Debug)]
pub(super) struct ResolvedBy(pub(super) String);

/// One `tutor_http_request` event.
#[derive(Debug)]
struct RequestRecord {
    method: Method,
    route: String,
    session_id: Option<String>,
    status: u16,
    resolved_by: Option<String>,
    latency_ms: u64,
}

pub(super) async fn request_observability_middleware(mut req: Request, next: Next) -> Response {
    let request_id = client_request_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });

    let path = req.uri().path().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string());
    let session_id = route
        .as_deref()
        .and_then(|route| session_id_from_path(route, &path));
    let method = req.method().clone();
    let started_at = Instant::now();

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), value);
    }

    let record = RequestRecord {
        method,
        route: route.unwrap_or(path),
        session_id,
        status: response.status().as_u16(),
        resolved_by: response
            .extensions()
            .get::<ResolvedBy>()
            .map(|resolved| resolved.0.clone()),
        latency_ms: started_at.elapsed().as_millis().min(u64::MAX as u128) as u64,
    };
    log_request(&request_id, &record);

    response
}

fn log_request(request_id: &str, record: &RequestRecord) {
    let session_id = record.session_id.as_deref().unwrap_or("-");
    let resolved_by = record.resolved_by.as_deref().unwrap_or("-");
    if record.status >= 500 {
        warn!(
            request_id,
            method = %record.method,
            route = %record.route,
            session_id,
            status = record.status,
            latency_ms = record.latency_ms,
            metric_name = "tutor_http_request",
            "tutor request failed"
        );
    } else {
        info!(
            request_id,
            method = %record.method,
            route = %record.route,
            session_id,
            status = record.status,
            resolved_by,
            latency_ms = record.latency_ms,
            metric_name = "tutor_http_request",
            "tutor request handled"
        );
    }
}

/// Picks the raw `{session_id}` segment out of the request path for routes
/// that carry one. Parsing and lookup stay with the handlers.
fn session_id_from_path(route: &str, path: &str) -> Option<String> {
    route
        .split('/')
        .zip(path.split('/'))
        .find(|(template, _)| *template == SESSION_ID_SEGMENT)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

fn client_request_id(req: &Request) -> Option<String> {
    let raw = req.headers().get(&REQUEST_ID_HEADER)?.to_str().ok()?;
    let trimmed = raw.trim();
    let valid = !trimmed.is_empty()
        && trimmed.len() <= MAX_REQUEST_ID_LEN
        && trimmed
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.'));
    valid.then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::Request;

    use super::{client_request_id, session_id_from_path};

    fn with_request_id(value: &str) -> Request {
        Request::builder()
            .uri("/v1/sessions")
            .header("x-request-id", value)
            .body(Body::empty())
            .expect("request should build")
    }

    #[test]
    fn keeps_well_formed_client_request_ids() {
        assert_eq!(
            client_request_id(&with_request_id(" turn-42._x ")),
            Some("turn-42._x".to_string())
        );
    }

    #[test]
    fn drops_malformed_client_request_ids() {
        assert!(client_request_id(&with_request_id("ask me$")).is_none());
        assert!(client_request_id(&with_request_id(&"q".repeat(129))).is_none());
        assert!(client_request_id(&with_request_id("   ")).is_none());
    }

    #[test]
    fn extracts_session_id_only_for_session_routes() {
        assert_eq!(
            session_id_from_path(
                "/v1/sessions/{session_id}/messages",
                "/v1/sessions/7d9f2c4e-8a51-4d7b-9a3e-0f6b1c2d3e4f/messages"
            ),
            Some("7d9f2c4e-8a51-4d7b-9a3e-0f6b1c2d3e4f".to_string())
        );
        assert_eq!(
            session_id_from_path("/v1/sessions/{session_id}", "/v1/sessions/not-a-uuid"),
            Some("not-a-uuid".to_string())
        );
        assert!(session_id_from_path("/v1/sessions", "/v1/sessions").is_none());
        assert!(session_id_from_path("/healthz", "/healthz").is_none());
    }
}
