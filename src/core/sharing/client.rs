//! HTTP client for the share service.

use reqwest::StatusCode;

use super::protocol::{CreateShareResponse, ShareStats};
use crate::core::codec;
use crate::core::error::{ModelerError, Result};
use crate::core::schema::Schema;

#[derive(Debug, Clone)]
pub struct ShareClient {
    http: reqwest::Client,
    base_url: String,
}

impl ShareClient {
    /// `base_url` is the service root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn share_url(&self, id: &str) -> String {
        format!("{}/api/share/{}", self.base_url, id)
    }

    /// Upload a schema and return its share id.
    pub async fn create(&self, schema: &Schema) -> Result<String> {
        let body = codec::encode_compact(schema)?;
        let response = self
            .http
            .post(format!("{}/api/share", self.base_url))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status == StatusCode::INSUFFICIENT_STORAGE {
            tracing::warn!("Share service is at capacity");
            return Err(ModelerError::CapacityExceeded);
        }
        if !status.is_success() {
            return Err(unexpected_status(status));
        }

        let created: CreateShareResponse = response.json().await.map_err(transport)?;
        tracing::info!("Schema shared as {}", created.id);
        Ok(created.id)
    }

    /// Fetch a shared schema. A missing or expired id is `Expired`.
    pub async fn fetch(&self, id: &str) -> Result<Schema> {
        let response = self
            .http
            .get(self.share_url(id))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::info!("Shared schema {} not found or expired", id);
            return Err(ModelerError::Expired { id: id.to_string() });
        }
        if !status.is_success() {
            return Err(unexpected_status(status));
        }

        let text = response.text().await.map_err(transport)?;
        codec::decode(&text)
    }

    pub async fn stats(&self) -> Result<ShareStats> {
        let response = self
            .http
            .get(format!("{}/api/share", self.base_url))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(unexpected_status(status));
        }
        response.json().await.map_err(transport)
    }
}

fn transport(err: reqwest::Error) -> ModelerError {
    tracing::warn!("Share request failed: {}", err);
    ModelerError::Transport(err.to_string())
}

fn unexpected_status(status: StatusCode) -> ModelerError {
    tracing::warn!("Share service responded with {}", status);
    ModelerError::Transport(format!("unexpected status {status}"))
}
