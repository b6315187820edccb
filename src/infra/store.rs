use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::AppConfig;
use crate::domain::document::Document;

/// Read-only access to the `users` collection. This service never writes.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetches a user document by id; `Ok(None)` when it does not exist.
    async fn fetch_user(&self, user_id: &str) -> Result<Option<Document>>;
}

#[derive(Clone)]
pub struct FirestoreUsers {
    client: Client,
    base_url: String,
    bearer_token: String,
}

impl FirestoreUsers {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: format!(
                "{}/projects/{}/databases/(default)/documents",
                config.firestore_endpoint.trim_end_matches('/'),
                config.project_id
            ),
            bearer_token: config.google_bearer_token.clone(),
        })
    }
}

#[async_trait]
impl UserStore for FirestoreUsers {
    async fn fetch_user(&self, user_id: &str) -> Result<Option<Document>> {
        let url = format!("{}/users/{}", self.base_url, user_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("user lookup failed: {} {}", status, body));
        }

        let body: Value = response.json().await?;
        Ok(Some(decode_document(&body)))
    }
}

/// The store's REST surface wraps every field in a typed-value object
/// (`{"stringValue": "x"}`); flatten the scalar types into plain JSON.
fn decode_document(body: &Value) -> Document {
    let mut fields = BTreeMap::new();
    if let Some(map) = body.get("fields").and_then(Value::as_object) {
        for (name, typed) in map {
            fields.insert(name.clone(), decode_value(typed));
        }
    }
    Document::from(fields)
}

fn decode_value(typed: &Value) -> Value {
    if let Some(s) = typed.get("stringValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    // integerValue is string-encoded on the wire
    if let Some(s) = typed.get("integerValue").and_then(Value::as_str) {
        if let Ok(n) = s.parse::<i64>() {
            return Value::from(n);
        }
    }
    if let Some(n) = typed.get("doubleValue").and_then(Value::as_f64) {
        return Value::from(n);
    }
    if let Some(b) = typed.get("booleanValue").and_then(Value::as_bool) {
        return Value::Bool(b);
    }
    if let Some(s) = typed.get("timestampValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    // nullValue, arrays, and nested maps are not used by the dispatchers
    Value::Null
}
