#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use courier::domain::document::Document;
use courier::domain::push::PushMessage;
use courier::infra::push::PushGateway;
use courier::infra::store::UserStore;
use courier::AppState;

// ---------------------------------------------------------------------------
// TestApp — real router over in-memory collaborators
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub users: Arc<MemoryUsers>,
    pub push: Arc<RecordingGateway>,
}

pub struct TestResponse {
    pub status: StatusCode,
    body_bytes: bytes::Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }

    pub fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap_or("").to_string()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUsers::default());
        let push = Arc::new(RecordingGateway::default());

        let state = AppState {
            users: users.clone(),
            push: push.clone(),
        };
        let router = courier::http::router(state);

        TestApp {
            router,
            users,
            push,
        }
    }

    // ------------------------------------------------------------------
    // Request helpers
    // ------------------------------------------------------------------
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", "localhost");

        let request = if let Some(body) = body {
            builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot failed");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes();

        TestResponse { status, body_bytes }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body)).await
    }

    // ------------------------------------------------------------------
    // Fixture helpers
    // ------------------------------------------------------------------
    pub fn seed_user(&self, user_id: &str, fields: Value) {
        let doc: Document = serde_json::from_value(fields).expect("user fields must be an object");
        self.users.insert(user_id, doc);
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        self.push.sent()
    }
}

// ---------------------------------------------------------------------------
// In-memory user store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryUsers {
    docs: Mutex<HashMap<String, Document>>,
}

impl MemoryUsers {
    pub fn insert(&self, user_id: &str, doc: Document) {
        self.docs.lock().unwrap().insert(user_id.to_string(), doc);
    }
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn fetch_user(&self, user_id: &str) -> Result<Option<Document>> {
        Ok(self.docs.lock().unwrap().get(user_id).cloned())
    }
}

// ---------------------------------------------------------------------------
// Recording push gateway
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingGateway {
    messages: Mutex<Vec<PushMessage>>,
    fail_next: AtomicBool,
    counter: AtomicUsize,
}

impl RecordingGateway {
    pub fn sent(&self) -> Vec<PushMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Makes every subsequent send fail, for exercising the swallow-all path.
    pub fn fail_sends(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PushGateway for RecordingGateway {
    async fn send(&self, message: &PushMessage) -> Result<String> {
        if self.fail_next.load(Ordering::SeqCst) {
            return Err(anyhow!("gateway unavailable"));
        }
        self.messages.lock().unwrap().push(message.clone());
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("projects/test/messages/{}", n))
    }
}
