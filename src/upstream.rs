//! Admin source service client.
//!
//! The admin API is the source of truth for documents. The gateway issues a
//! single `GET <admin_url>/source<canonical path>` per request and relays the
//! answer; HTTP error statuses are answers, only transport failures are errors.

use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors talking to the admin service
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("admin transport error: {0}")]
    Transport(String),

    #[error("admin client error: {0}")]
    Client(String),
}

/// A complete admin response, body fully read.
#[derive(Debug, Clone)]
pub struct AdminResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Admin fetch capability.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    /// GET `url` with the given request headers.
    async fn fetch(&self, url: &str, headers: HeaderMap) -> Result<AdminResponse, AdminError>;
}

/// Admin source URL for a canonical path.
pub fn source_url(admin_url: &str, canonical_path: &str) -> String {
    format!("{}/source{}", admin_url.trim_end_matches('/'), canonical_path)
}

/// reqwest-backed admin client. Connection reuse comes from the shared client.
pub struct HttpAdminBackend {
    client: reqwest::Client,
}

impl HttpAdminBackend {
    pub fn new() -> Result<Self, AdminError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AdminError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AdminBackend for HttpAdminBackend {
    #[instrument(skip(self, headers))]
    async fn fetch(&self, url: &str, headers: HeaderMap) -> Result<AdminResponse, AdminError> {
        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| AdminError::Transport(e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| AdminError::Transport(format!("reading body: {}", e)))?;

        debug!("admin GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(AdminResponse {
            status,
            headers,
            body,
        })
    }
}
