//! Outbound HTTP collaborator
//!
//! The pipeline never opens connections itself. It shapes a [`JsonRequest`]
//! and hands it to an [`HttpFetcher`], which returns the decoded JSON body or
//! a [`TransportError`]. [`ReqwestFetcher`] is the default implementation;
//! tests substitute their own.

pub mod classify;
pub mod headers;
mod reqwest_fetcher;

pub use classify::classify_http_error;
pub use headers::HttpHeaderBuilder;
pub use reqwest_fetcher::ReqwestFetcher;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::TransportError;

/// Log target of transport events.
pub const HTTP_TARGET: &str = "siumai_catalog::http";

/// A `GET` request expecting a JSON body.
#[derive(Debug, Clone)]
pub struct JsonRequest {
    pub url: String,
    pub headers: HeaderMap,
}

impl JsonRequest {
    pub fn new(url: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            url: url.into(),
            headers,
        }
    }
}

/// Fetches decoded JSON documents.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Perform one request. Implementations must stop waiting and return
    /// [`TransportError::Cancelled`] once `cancel` fires.
    async fn fetch_json(
        &self,
        request: JsonRequest,
        cancel: &CancellationToken,
    ) -> Result<Value, TransportError>;
}
