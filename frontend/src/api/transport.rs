use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Request};
use serde::de::DeserializeOwned;

use super::types::ApiError;

/// A fully read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Executes a prepared request. Futures are not `Send`: in the browser the
/// whole client lives on the event loop thread.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn execute(&self, request: Request) -> Result<RawResponse, ApiError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: Request) -> Result<RawResponse, ApiError> {
        let method = request.method().clone();
        let url = request.url().clone();
        let response = self.client.execute(request).await.map_err(|e| {
            log::warn!("{} {} failed before a response arrived: {}", method, url, e);
            ApiError::network(e.to_string())
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response body: {}", e)))?;

        log::debug!("{} {} -> {}", method, url.path(), status);
        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}
