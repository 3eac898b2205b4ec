pub mod pivotal;
pub mod stories;

use async_trait::async_trait;
use serde_json::Value;

/// Any failure talking to the tracker. Callers treat every variant the same way.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request returned {status}")]
    Status { status: u16 },
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Empty response")]
    Empty,
}

/// Request/response boundary to the tracker. A successful response with an
/// empty body is `Ok(None)`.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    async fn get(&self, path: &str) -> Result<Option<Value>, ApiError>;
    async fn post(&self, path: &str, body: Value) -> Result<Option<Value>, ApiError>;
    async fn put(&self, path: &str, body: Value) -> Result<Option<Value>, ApiError>;
    async fn delete(&self, path: &str) -> Result<Option<Value>, ApiError>;
}

#[cfg(test)]
pub mod tests;
