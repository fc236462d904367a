use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::{HTTP_TARGET, HttpFetcher, JsonRequest, classify_http_error};
use crate::config::HttpConfig;
use crate::defaults;
use crate::error::{CatalogError, TransportError};

/// [`HttpFetcher`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Build a client honoring the timeouts, proxy and user agent of `config`.
    pub fn new(config: &HttpConfig) -> Result<Self, CatalogError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout.unwrap_or(defaults::http::REQUEST_TIMEOUT))
            .connect_timeout(
                config
                    .connect_timeout
                    .unwrap_or(defaults::http::CONNECT_TIMEOUT),
            )
            .user_agent(
                config
                    .user_agent
                    .as_deref()
                    .unwrap_or(defaults::http::USER_AGENT),
            );
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| {
                CatalogError::ConfigurationError(format!("Invalid proxy '{proxy}': {e}"))
            })?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().map_err(|e| {
            CatalogError::ConfigurationError(format!("Failed to build HTTP client: {e}"))
        })?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: JsonRequest) -> Result<Value, TransportError> {
        let response = self
            .client
            .get(&request.url)
            .headers(request.headers)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            let error =
                classify_http_error(status.as_u16(), &body, &headers, status.canonical_reason());
            tracing::debug!(
                target: HTTP_TARGET,
                status = status.as_u16(),
                %error,
                "request failed"
            );
            return Err(error);
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch_json(
        &self,
        request: JsonRequest,
        cancel: &CancellationToken,
    ) -> Result<Value, TransportError> {
        tracing::debug!(target: HTTP_TARGET, url = %request.url, "GET");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(target: HTTP_TARGET, "request cancelled");
                Err(TransportError::Cancelled)
            }
            result = self.send(request) => result,
        }
    }
}
