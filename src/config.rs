//! Access and runtime configuration.
//!
//! - `AccessConfig` identifies the provider dialect and carries credentials for
//!   the HTTP collaborator
//! - `HttpConfig` shapes the default `reqwest` client
//! - `CatalogOptions` holds the process-level switches (diagnostics)

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::CatalogError;

/// Provider dialects known to the application.
///
/// Only dialects with a registered catalog pipeline can be dispatched; the rest
/// are rejected as request errors by [`crate::dispatch::CatalogDispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Ollama,
    Xai,
    Groq,
    Deepseek,
}

impl Dialect {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Ollama => "ollama",
            Self::Xai => "xai",
            Self::Groq => "groq",
            Self::Deepseek => "deepseek",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "googleai" | "google" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            "xai" => Ok(Self::Xai),
            "groq" => Ok(Self::Groq),
            "deepseek" => Ok(Self::Deepseek),
            _ => Err(CatalogError::UnsupportedDialect(s.to_string())),
        }
    }
}

/// HTTP configuration for the default transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout
    #[serde(with = "duration_option_serde")]
    pub timeout: Option<Duration>,
    /// Connection timeout
    #[serde(with = "duration_option_serde")]
    pub connect_timeout: Option<Duration>,
    /// Custom headers (win over generated ones on collision)
    pub headers: HashMap<String, String>,
    /// Proxy URL
    pub proxy: Option<String>,
    /// User agent
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(defaults::http::REQUEST_TIMEOUT),
            connect_timeout: Some(defaults::http::CONNECT_TIMEOUT),
            headers: HashMap::new(),
            proxy: None,
            user_agent: Some(defaults::http::USER_AGENT.to_string()),
        }
    }
}

impl HttpConfig {
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_proxy<S: Into<String>>(mut self, proxy: S) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Whether a custom `Authorization` header was supplied (case-insensitive).
    pub fn has_authorization(&self) -> bool {
        self.headers
            .keys()
            .any(|k| k.eq_ignore_ascii_case("authorization"))
    }
}

// Durations are serialized as whole seconds.
mod duration_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.map(|d| d.as_secs()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

/// Credentials and endpoint for one catalog dispatch.
#[derive(Clone)]
pub struct AccessConfig {
    pub dialect: Dialect,
    /// API key (securely stored)
    pub api_key: SecretString,
    /// Base URL override; the dialect default is used when `None`
    pub base_url: Option<String>,
    pub http: HttpConfig,
    /// `pageSize` requested from the listing endpoint
    pub page_size: u32,
}

impl fmt::Debug for AccessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessConfig")
            .field("dialect", &self.dialect)
            .field(
                "api_key_present",
                &(!self.api_key.expose_secret().is_empty()),
            )
            .field("base_url", &self.base_url)
            .field("http", &self.http)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl AccessConfig {
    pub fn new<S: Into<String>>(dialect: Dialect, api_key: S) -> Self {
        Self {
            dialect,
            api_key: SecretString::from(api_key.into()),
            base_url: None,
            http: HttpConfig::default(),
            page_size: defaults::gemini::PAGE_SIZE,
        }
    }

    /// Gemini access with the given API key
    pub fn gemini<S: Into<String>>(api_key: S) -> Self {
        Self::new(Dialect::Gemini, api_key)
    }

    /// Read `GEMINI_API_KEY` (and optionally `GEMINI_BASE_URL`) from the environment.
    pub fn gemini_from_env() -> Result<Self, CatalogError> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            CatalogError::InvalidParameter("GEMINI_API_KEY is not set".to_string())
        })?;
        let mut config = Self::gemini(api_key);
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        Ok(config)
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Check the configuration before any network activity.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.api_key.expose_secret().trim().is_empty() && !self.http.has_authorization() {
            return Err(CatalogError::InvalidParameter(format!(
                "{} access requires an API key or an Authorization header",
                self.dialect
            )));
        }
        if let Some(base_url) = &self.base_url {
            reqwest::Url::parse(base_url).map_err(|e| {
                CatalogError::InvalidParameter(format!("Invalid base URL '{base_url}': {e}"))
            })?;
        }
        if self.page_size == 0 {
            return Err(CatalogError::InvalidParameter(
                "page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Process-level switches, evaluated once and then fixed for a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogOptions {
    /// Run the consistency diagnostics side channel
    pub diagnostics: bool,
}

impl CatalogOptions {
    pub const fn production() -> Self {
        Self { diagnostics: false }
    }

    pub const fn diagnostic() -> Self {
        Self { diagnostics: true }
    }

    /// Read `SIUMAI_CATALOG_DIAGNOSTICS`; debug builds default to diagnostics on.
    pub fn from_env() -> Self {
        let diagnostics = match std::env::var(defaults::DIAGNOSTICS_ENV) {
            Ok(val) => parse_flag(&val).unwrap_or(cfg!(debug_assertions)),
            Err(_) => cfg!(debug_assertions),
        };
        Self { diagnostics }
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
