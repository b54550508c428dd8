#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::IntoResponse,
};
use serde_json::{Value, json};

pub const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/test_service_account_key.pem");
pub const TEST_PUBLIC_KEY: &str = include_str!("../fixtures/test_service_account_pub.pem");

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Clone)]
pub struct FakeEndpoint {
    pub status: StatusCode,
    pub body: String,
    pub delay: Option<std::time::Duration>,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeEndpoint {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn json(body: Value) -> Self {
        Self::new(StatusCode::OK, body.to_string())
    }

    pub fn delayed(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(endpoint): State<FakeEndpoint>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    endpoint.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body,
    });

    if let Some(delay) = endpoint.delay {
        tokio::time::sleep(delay).await;
    }

    (endpoint.status, endpoint.body.clone())
}

/// Serves `endpoint` for every path on an ephemeral local port.
pub async fn serve(endpoint: FakeEndpoint) -> SocketAddr {
    let app = Router::new().fallback(record).with_state(endpoint);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn vertex_envelope(reply_text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": reply_text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 8},
        "modelVersion": "gemini-2.5-flash"
    })
}

/// Writes a service-account descriptor pointing at `token_uri`.
pub fn write_service_account(token_uri: &str) -> PathBuf {
    let descriptor = json!({
        "type": "service_account",
        "project_id": "pantry-test",
        "private_key_id": "test-key-1",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": "scanner@pantry-test.iam.gserviceaccount.com",
        "token_uri": token_uri,
    });
    let path = std::env::temp_dir().join(format!("larder-sa-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, descriptor.to_string()).unwrap();
    path
}
