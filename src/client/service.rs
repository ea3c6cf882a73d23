//! HTTP client for the analysis service.
//!
//! Speaks the service's small JSON API:
//! - `POST /api/analyze` with `{"text": ...}` returns `{"result": ...}`
//! - `GET /api/save` returns `{"message": ...}`
//! - `GET /api/history` returns `{"history": [{"text": ..., "result": ...}]}`

use crate::client::{Classifier, ClientError, HistoryStore};
use crate::models::HistoryEntry;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Connection settings for the analysis service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub analyze_path: String,
    pub save_path: String,
    pub history_path: String,
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            analyze_path: "/api/analyze".to_string(),
            save_path: "/api/save".to_string(),
            history_path: "/api/history".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl From<&crate::config::ServiceConfig> for ClientConfig {
    fn from(config: &crate::config::ServiceConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            analyze_path: config.analyze_path.clone(),
            save_path: config.save_path.clone(),
            history_path: config.history_path.clone(),
            timeout_seconds: config.timeout_seconds,
        }
    }
}

impl ClientConfig {
    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    history: Vec<HistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// reqwest-backed client implementing both collaborator traits.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct ServiceClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl ServiceClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    #[cfg(test)]
    fn with_http_client(config: ClientConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout(self.config.timeout_seconds)
        } else if e.is_connect() {
            ClientError::Connect(self.config.base_url.clone())
        } else {
            ClientError::Transport(e.to_string())
        }
    }

    /// Check the status and decode a JSON body.
    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.config.url(path);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        self.decode(response).await
    }
}

#[async_trait]
impl Classifier for ServiceClient {
    async fn classify(&self, text: &str) -> Result<String, ClientError> {
        let url = self.config.url(&self.config.analyze_path);

        let response = self
            .http_client
            .post(&url)
            .json(&AnalyzeRequest { text })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let body: AnalyzeResponse = self.decode(response).await?;
        Ok(body.result)
    }

    fn endpoint(&self) -> String {
        self.config.url(&self.config.analyze_path)
    }
}

#[async_trait]
impl HistoryStore for ServiceClient {
    async fn save(&self) -> Result<String, ClientError> {
        let body: SaveResponse = self.get(&self.config.save_path).await?;
        Ok(body.message)
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, ClientError> {
        let body: HistoryResponse = self.get(&self.config.history_path).await?;
        Ok(body.history)
    }
}
