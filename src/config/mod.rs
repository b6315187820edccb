use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub http_addr: String,
    pub project_id: String,
    pub firestore_endpoint: String,
    pub fcm_endpoint: String,
    pub google_bearer_token: String,
    pub http_timeout_seconds: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let http_addr = env_or("HTTP_ADDR", "0.0.0.0:8080");
        let _parsed_http_addr = SocketAddr::from_str(&http_addr)
            .map_err(|err| anyhow!("invalid HTTP_ADDR: {}", err))?;

        Ok(Self {
            http_addr,
            project_id: env_or_err("GCP_PROJECT_ID")?,
            firestore_endpoint: env_or("FIRESTORE_ENDPOINT", "https://firestore.googleapis.com/v1"),
            fcm_endpoint: env_or("FCM_ENDPOINT", "https://fcm.googleapis.com/v1"),
            google_bearer_token: env_or_err("GOOGLE_BEARER_TOKEN")?,
            http_timeout_seconds: env_or_parse("HTTP_TIMEOUT_SECONDS", "10")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_err(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow!("missing required env var: {}", key))
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}
