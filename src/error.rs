//! Error Handling Module
//!
//! Errors are split along the same lines the dispatch pipeline fails:
//! - `CatalogError` is what callers of [`crate::dispatch`] see
//! - `TransportError` is what the HTTP collaborator produces; it is carried
//!   verbatim inside `CatalogError::Transport` together with the provider tag
//!
//! # Example
//!
//! ```rust,ignore
//! use siumai_catalog::error::{CatalogError, ErrorCategory};
//!
//! let error = CatalogError::UnsupportedDialect("openai".into());
//! assert_eq!(error.category(), ErrorCategory::Request);
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Coarse classification of a [`CatalogError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Unsupported dialect or malformed access configuration. Never retried.
    Request,
    /// Misauthored rule table or local setup problem.
    Configuration,
    /// Network/auth failure reported by the HTTP collaborator.
    Transport,
    /// Upstream payload does not match the expected wire shape.
    Validation,
    /// A pipeline invariant was broken (filter and resolver disagree).
    Internal,
}

/// Errors produced by the catalog dispatch pipeline.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The access configuration names a dialect with no catalog pipeline.
    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),

    /// A request parameter is malformed (bad base URL, empty key, ...).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Rule table or client construction failed.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The HTTP collaborator failed; the inner error is preserved as-is.
    #[error("[{provider}] {source}")]
    Transport {
        provider: String,
        #[source]
        source: TransportError,
    },

    /// The upstream payload failed validation; no partial list is returned.
    #[error("[{provider}] invalid models payload: {message}")]
    ValidationError { provider: String, message: String },

    /// A filtered model could not be resolved against any rule.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Tracing subscriber initialization failed.
    #[error("Telemetry initialization error: {0}")]
    TelemetryInit(String),
}

impl CatalogError {
    /// Wrap a transport failure with the provider it came from.
    pub fn transport(provider: impl Into<String>, source: TransportError) -> Self {
        Self::Transport {
            provider: provider.into(),
            source,
        }
    }

    /// Build a validation failure tagged with the provider.
    pub fn validation(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedDialect(_) | Self::InvalidParameter(_) => ErrorCategory::Request,
            Self::ConfigurationError(_) | Self::TelemetryInit(_) => ErrorCategory::Configuration,
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// Whether a caller-side retry may succeed. The pipeline never retries itself.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Provider tag, when the error originated from a provider call.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Transport { provider, .. } | Self::ValidationError { provider, .. } => {
                Some(provider)
            }
            _ => None,
        }
    }

    /// HTTP status code for transport failures that carry one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { source, .. } => source.status_code(),
            _ => None,
        }
    }
}

/// Errors returned by the outbound HTTP collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Request timed out: {0}")]
    TimeoutError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    /// A successful response whose body is not JSON.
    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl TransportError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::AuthenticationError(_) => Some(401),
            Self::PermissionDenied(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::RateLimitError(_) => Some(429),
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimitError(_) | Self::TimeoutError(_) | Self::ConnectionError(_) => true,
            Self::ApiError { code, .. } => *code >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError(err.to_string())
        } else if err.is_connect() {
            Self::ConnectionError(err.to_string())
        } else if err.is_decode() {
            Self::InvalidBody(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidBody(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_keep_provider_tag_and_source() {
        let err = CatalogError::transport(
            "gemini",
            TransportError::AuthenticationError("API key not valid".into()),
        );
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert_eq!(err.provider(), Some("gemini"));
        assert_eq!(err.status_code(), Some(401));
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "[gemini] Authentication failed: API key not valid"
        );

        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "Authentication failed: API key not valid");
    }

    #[test]
    fn retryability_follows_status() {
        let server = TransportError::ApiError {
            code: 503,
            message: "unavailable".into(),
            details: None,
        };
        let client = TransportError::ApiError {
            code: 400,
            message: "bad".into(),
            details: None,
        };
        assert!(server.is_retryable());
        assert!(!client.is_retryable());
        assert!(TransportError::RateLimitError("slow down".into()).is_retryable());
        assert!(!TransportError::Cancelled.is_retryable());
    }

    #[test]
    fn categories_cover_taxonomy() {
        assert_eq!(
            CatalogError::UnsupportedDialect("x".into()).category(),
            ErrorCategory::Request
        );
        assert_eq!(
            CatalogError::validation("gemini", "missing name").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            CatalogError::InternalError("unmatched".into()).category(),
            ErrorCategory::Internal
        );
        assert_eq!(
            CatalogError::ConfigurationError("dangling".into()).category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn serde_json_errors_become_invalid_body() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err: TransportError = json_err.into();
        assert!(matches!(err, TransportError::InvalidBody(_)));
    }
}
