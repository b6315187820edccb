use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::AppConfig;
use crate::domain::push::PushMessage;

/// The messaging gateway. One best-effort attempt per message; retrying is
/// the caller's concern (and nothing here retries).
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Submits one message and returns the gateway's receipt id.
    async fn send(&self, message: &PushMessage) -> Result<String>;
}

#[derive(Clone)]
pub struct FcmClient {
    client: Client,
    send_url: String,
    bearer_token: String,
}

impl FcmClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            send_url: format!(
                "{}/projects/{}/messages:send",
                config.fcm_endpoint.trim_end_matches('/'),
                config.project_id
            ),
            bearer_token: config.google_bearer_token.clone(),
        })
    }
}

#[async_trait]
impl PushGateway for FcmClient {
    async fn send(&self, message: &PushMessage) -> Result<String> {
        let response = self
            .client
            .post(&self.send_url)
            .bearer_auth(&self.bearer_token)
            .json(&json!({ "message": message }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("push send rejected: {} {}", status, body));
        }

        let body: Value = response.json().await?;
        let receipt_id = body
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(receipt_id)
    }
}
