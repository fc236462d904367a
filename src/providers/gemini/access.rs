//! Gemini endpoint and header shaping.
//!
//! Headers:
//! - always `Accept: application/json`
//! - `x-goog-api-key` unless the custom headers already carry `Authorization`
//!   (e.g. an OAuth bearer token)
//! - custom headers merged last, winning on name collisions

use std::collections::HashMap;

use reqwest::header::HeaderMap;
use secrecy::ExposeSecret;

use super::wire::MODELS_PATH;
use crate::config::AccessConfig;
use crate::defaults;
use crate::error::CatalogError;
use crate::transport::{HttpHeaderBuilder, JsonRequest};

pub fn build_gemini_headers(
    api_key: &str,
    custom_headers: &HashMap<String, String>,
) -> Result<HeaderMap, CatalogError> {
    let has_authorization = custom_headers
        .keys()
        .any(|k| k.eq_ignore_ascii_case("authorization"));

    let mut builder = HttpHeaderBuilder::new().with_json_accept();
    if !has_authorization && !api_key.is_empty() {
        builder = builder.with_custom_auth("x-goog-api-key", api_key)?;
    }
    Ok(builder.with_custom_headers(custom_headers)?.build())
}

/// `{base}/models?pageSize=..[&pageToken=..]`
pub fn models_url(base_url: &str, page_size: u32, page_token: Option<&str>) -> String {
    let mut url = format!(
        "{}{MODELS_PATH}?pageSize={page_size}",
        base_url.trim_end_matches('/')
    );
    if let Some(token) = page_token {
        url.push_str("&pageToken=");
        url.push_str(&urlencoding::encode(token));
    }
    url
}

/// Request for one listing page.
pub fn list_models_request(
    access: &AccessConfig,
    page_token: Option<&str>,
) -> Result<JsonRequest, CatalogError> {
    let base_url = access
        .base_url
        .as_deref()
        .unwrap_or(defaults::gemini::BASE_URL);
    let headers = build_gemini_headers(access.api_key.expose_secret(), &access.http.headers)?;
    Ok(JsonRequest::new(
        models_url(base_url, access.page_size, page_token),
        headers,
    ))
}
