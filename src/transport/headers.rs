//! Request header construction.
//!
//! Invalid header names or values come from the caller's access
//! configuration, so they surface as request errors.

use std::collections::HashMap;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};

use crate::error::CatalogError;

/// Builder for outbound request headers.
#[derive(Debug, Clone, Default)]
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect a JSON response.
    pub fn with_json_accept(mut self) -> Self {
        self.headers
            .insert(ACCEPT, HeaderValue::from_static("application/json"));
        self
    }

    /// Add a provider-specific auth header, e.g. `x-goog-api-key`.
    pub fn with_custom_auth(
        mut self,
        header_name: &str,
        value: &str,
    ) -> Result<Self, CatalogError> {
        let name = header_name_from(header_name)?;
        let mut value = HeaderValue::from_str(value).map_err(|e| {
            CatalogError::InvalidParameter(format!("Invalid API key format: {e}"))
        })?;
        value.set_sensitive(true);
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Merge caller-supplied headers; they override anything set before.
    pub fn with_custom_headers(
        mut self,
        custom_headers: &HashMap<String, String>,
    ) -> Result<Self, CatalogError> {
        for (key, value) in custom_headers {
            let name = header_name_from(key)?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                CatalogError::InvalidParameter(format!("Invalid header value for '{key}': {e}"))
            })?;
            self.headers.insert(name, value);
        }
        Ok(self)
    }

    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

fn header_name_from(name: &str) -> Result<HeaderName, CatalogError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| CatalogError::InvalidParameter(format!("Invalid header name '{name}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_auth_is_marked_sensitive() {
        let headers = HttpHeaderBuilder::new()
            .with_json_accept()
            .with_custom_auth("x-goog-api-key", "secret")
            .unwrap()
            .build();
        let key = headers.get("x-goog-api-key").unwrap();
        assert_eq!(key, "secret");
        assert!(key.is_sensitive());
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn custom_headers_override_earlier_values() {
        let custom = HashMap::from([("Accept".to_string(), "application/x-ndjson".to_string())]);
        let headers = HttpHeaderBuilder::new()
            .with_json_accept()
            .with_custom_headers(&custom)
            .unwrap()
            .build();
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/x-ndjson");
        assert_eq!(headers.get_all(ACCEPT).iter().count(), 1);
    }

    #[test]
    fn invalid_names_and_values_are_request_errors() {
        let bad_name = HashMap::from([("bad header".to_string(), "v".to_string())]);
        let err = HttpHeaderBuilder::new()
            .with_custom_headers(&bad_name)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidParameter(_)));

        let err = HttpHeaderBuilder::new()
            .with_custom_auth("x-goog-api-key", "line\nbreak")
            .unwrap_err();
        assert!(err.to_string().contains("Invalid API key format"));
    }
}
