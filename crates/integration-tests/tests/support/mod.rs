#![allow(dead_code)]

use std::sync::Arc;

use api_server::http::{AppState, build_router};
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use shared::conversation_store::ConversationStore;
use shared::llm::{ModelGateway, OllamaGateway, OllamaGatewayConfig, ResponseResolver};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};
use tower::ServiceExt;

pub struct JsonResponse {
    pub status: StatusCode,
    pub request_id: Option<String>,
    pub body: Value,
}

pub fn build_test_router(gateways: Vec<Arc<dyn ModelGateway>>) -> Router {
    build_test_router_with_idle_ttl(gateways, 3600)
}

pub fn build_test_router_with_idle_ttl(
    gateways: Vec<Arc<dyn ModelGateway>>,
    idle_ttl_seconds: u64,
) -> Router {
    build_router(AppState {
        resolver: Arc::new(ResponseResolver::new(gateways)),
        conversations: ConversationStore::new(idle_ttl_seconds),
    })
}

pub fn ollama_gateway(generate_url: String) -> Arc<dyn ModelGateway> {
    Arc::new(
        OllamaGateway::new(OllamaGatewayConfig {
            generate_url,
            model: "test-llama".to_string(),
            timeout_ms: 5_000,
        })
        .expect("ollama gateway should build"),
    )
}

/// Address that refuses connections: bound once, then released.
pub async fn unreachable_generate_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("listener address should resolve");
    drop(listener);
    format!("http://{addr}/api/generate")
}

pub struct MockOllama {
    pub generate_url: String,
    pub prompts: Arc<Mutex<Vec<String>>>,
    shutdown_tx: oneshot::Sender<()>,
    server_task: tokio::task::JoinHandle<()>,
}

impl MockOllama {
    /// Answers every generate call with `reply`.
    pub async fn start(reply: &'static str) -> Self {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let seen = prompts.clone();
        let app = Router::new().route(
            "/api/generate",
            post(move |Json(payload): Json<Value>| {
                let seen = seen.clone();
                async move {
                    let prompt = payload["prompt"].as_str().unwrap_or_default().to_string();
                    seen.lock().await.push(prompt);
                    Json(json!({ "response": reply, "done": true }))
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let local_addr = listener
            .local_addr()
            .expect("listener address should resolve");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server_task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("mock ollama should run");
        });

        Self {
            generate_url: format!("http://{local_addr}/api/generate"),
            prompts,
            shutdown_tx,
            server_task,
        }
    }

    pub async fn stop(self) {
        self.shutdown_tx.send(()).expect("shutdown signal should send");
        self.server_task.await.expect("server task should join");
    }
}

pub async fn send_json(app: &Router, request: Request<Body>) -> JsonResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should succeed");
    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should read");
    let body = serde_json::from_slice::<Value>(&body).unwrap_or_else(|_| json!({}));

    JsonResponse {
        status,
        request_id,
        body,
    }
}

pub fn request(method: Method, uri: &str, json_body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    match json_body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    }
}

pub fn error_code(body: &Value) -> Option<&str> {
    body.get("error")
        .and_then(|error| error.get("code"))
        .and_then(Value::as_str)
}

pub async fn create_session(app: &Router) -> String {
    let created = send_json(app, request(Method::POST, "/v1/sessions", None)).await;
    assert_eq!(created.status, StatusCode::CREATED);
    created.body["session_id"]
        .as_str()
        .expect("session id should be present")
        .to_string()
}
