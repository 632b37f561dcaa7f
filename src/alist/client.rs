use super::types::{ApiResponse, ListData, ListRequest, RemoteEntry};
use crate::config::AlistConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// AList reports success in the body with this code
const API_OK: i64 = 200;

/// Why a directory could not be listed.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("AList error {code}: {message}")]
    Api { code: i64, message: String },
}

/// Narrow contract the generator needs from the remote file API
#[async_trait::async_trait]
pub trait DirectoryLister: Send + Sync {
    /// List the direct children of `path`. `refresh` bypasses the server cache.
    async fn list_directory(&self, path: &str, refresh: bool)
        -> Result<Vec<RemoteEntry>, ListError>;
}

pub struct AlistClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl AlistClient {
    pub fn new(config: &AlistConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        let token = Some(config.token.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl DirectoryLister for AlistClient {
    async fn list_directory(
        &self,
        path: &str,
        refresh: bool,
    ) -> Result<Vec<RemoteEntry>, ListError> {
        let mut request = self
            .client
            .post(self.url("/fs/list"))
            .json(&ListRequest::new(path, refresh));
        if let Some(ref token) = self.token {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ListError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let envelope: ApiResponse<ListData> =
            serde_json::from_slice(&bytes).map_err(|e| ListError::Decode(e.to_string()))?;

        if envelope.code != API_OK {
            return Err(ListError::Api {
                code: envelope.code,
                message: envelope.message,
            });
        }

        let (entries, total) = envelope
            .data
            .map(|d| (d.content.unwrap_or_default(), d.total))
            .unwrap_or_default();

        tracing::debug!(
            path,
            refresh,
            entries = entries.len(),
            total = total.unwrap_or(0),
            "Listed AList directory"
        );
        Ok(entries)
    }
}
