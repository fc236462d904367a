//! HTTP failure classification.

use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::error::TransportError;

/// Request identifier headers quoted in error messages.
const REQUEST_ID_HEADERS: [&str; 4] = [
    "x-goog-request-id",
    "x-request-id",
    "x-trace-id",
    "traceparent",
];

const BODY_SAMPLE_CHARS: usize = 200;

/// Map a non-success response onto a [`TransportError`].
///
/// The message prefers Google's `{"error": {"message": ..}}` envelope and falls
/// back to a body sample, then to `fallback_message` (usually the canonical
/// reason phrase).
pub fn classify_http_error(
    status: u16,
    body_text: &str,
    headers: &HeaderMap,
    fallback_message: Option<&str>,
) -> TransportError {
    let envelope: Option<Value> = serde_json::from_str(body_text).ok();
    let upstream_message = envelope
        .as_ref()
        .and_then(|v| v.pointer("/error/message"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let ids: Vec<String> = REQUEST_ID_HEADERS
        .iter()
        .filter_map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .map(|v| format!("{name}={v}"))
        })
        .collect();
    let ids_suffix = if ids.is_empty() {
        String::new()
    } else {
        format!(" ids=[{}]", ids.join(","))
    };

    let message = match upstream_message {
        Some(message) => format!("{message}{ids_suffix}"),
        None if !body_text.trim().is_empty() => {
            let sample: String = body_text.chars().take(BODY_SAMPLE_CHARS).collect();
            format!("http={status}{ids_suffix} body_sample={sample}")
        }
        None => format!(
            "http={status}{ids_suffix} {}",
            fallback_message.unwrap_or("request failed")
        ),
    };

    match status {
        401 => TransportError::AuthenticationError(message),
        403 => TransportError::PermissionDenied(message),
        404 => TransportError::NotFound(message),
        429 => {
            let retry_after = headers
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .map(|v| format!(" retry_after={v}"))
                .unwrap_or_default();
            TransportError::RateLimitError(format!("{message}{retry_after}"))
        }
        // Gemini reports an invalid key as 400 INVALID_ARGUMENT / API_KEY_INVALID.
        400 if body_text.contains("API_KEY_INVALID") => {
            TransportError::AuthenticationError(message)
        }
        code => TransportError::ApiError {
            code,
            message,
            details: envelope.and_then(|v| v.get("error").cloned()),
        },
    }
}
