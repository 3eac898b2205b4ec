use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::{ApiError, TrackerApi};

pub const DEFAULT_API_BASE: &str = "https://www.pivotaltracker.com/services/v5";

pub struct PivotalClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl PivotalClient {
    pub fn new(token: String, base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            base_url,
            token,
            client: reqwest::Client::new(),
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<Value>, ApiError> {
        tracing::debug!(%method, path, "tracker request");
        let mut req = self
            .client
            .request(method, format!("{}{path}", self.base_url))
            .header("X-TrackerToken", &self.token);
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req.send().await.map_err(ApiError::Transport)?;
        let status = resp.status().as_u16();
        if status >= 400 {
            return Err(ApiError::Status { status });
        }

        let bytes = resp.bytes().await.map_err(ApiError::Transport)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[async_trait]
impl TrackerApi for PivotalClient {
    async fn get(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Option<Value>, ApiError> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Option<Value>, ApiError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.send(Method::DELETE, path, None).await
    }
}
