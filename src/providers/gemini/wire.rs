//! Gemini `GET /models` wire types.
//!
//! Based on the public reference for `models.list`:
//! https://ai.google.dev/api/models#method:-models.list

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use validator::Validate;

/// Path of the listing endpoint, relative to the versioned base URL.
pub const MODELS_PATH: &str = "/models";

/// A model record as returned upstream. Never mutated after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WireModel {
    /// Resource name, e.g. `models/gemini-2.5-pro`
    #[validate(length(min = 1))]
    pub name: String,
    /// Base model id, when the upstream reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub input_token_limit: u32,
    pub output_token_limit: u32,
    pub supported_generation_methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub max_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<bool>,
}

impl WireModel {
    pub fn supports(&self, method: &str) -> bool {
        self.supported_generation_methods.iter().any(|m| m == method)
    }
}

/// Response of the list models API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListModelsResponse {
    /// Absent only in an empty or token-only page
    #[serde(default)]
    pub models: Vec<WireModel>,
    /// Token for the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// JSON Schema of the listing payload.
///
/// Unknown fields are tolerated, but a page must carry `models` or
/// `nextPageToken` unless it is the bare `{}` returned for a key with no
/// models. Any other object is a foreign shape (a proxy envelope, an
/// OpenAI-style `{"data": [...]}` list) and fails.
pub fn list_models_schema() -> Value {
    let non_negative_u32 = json!({ "type": "integer", "minimum": 0, "maximum": u32::MAX });
    json!({
        "type": "object",
        "anyOf": [
            { "required": ["models"] },
            { "required": ["nextPageToken"] },
            { "maxProperties": 0 }
        ],
        "properties": {
            "models": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": [
                        "name",
                        "displayName",
                        "supportedGenerationMethods",
                        "inputTokenLimit",
                        "outputTokenLimit"
                    ],
                    "properties": {
                        "name": { "type": "string", "minLength": 1 },
                        "baseModelId": { "type": "string" },
                        "version": { "type": "string" },
                        "displayName": { "type": "string" },
                        "description": { "type": "string" },
                        "inputTokenLimit": non_negative_u32,
                        "outputTokenLimit": non_negative_u32,
                        "supportedGenerationMethods": {
                            "type": "array",
                            "items": { "type": "string" }
                        },
                        "temperature": { "type": "number" },
                        "maxTemperature": { "type": "number" },
                        "topP": { "type": "number" },
                        "topK": non_negative_u32,
                        "thinking": { "type": "boolean" }
                    }
                }
            },
            "nextPageToken": { "type": "string" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_official_model_record() {
        let model: WireModel = serde_json::from_value(json!({
            "name": "models/gemini-2.5-pro",
            "baseModelId": "gemini-2.5-pro",
            "version": "2.5",
            "displayName": "Gemini 2.5 Pro",
            "description": "Stable release of Gemini 2.5 Pro",
            "inputTokenLimit": 1048576,
            "outputTokenLimit": 65536,
            "supportedGenerationMethods": ["generateContent", "countTokens", "createCachedContent"],
            "temperature": 1,
            "topP": 0.95,
            "topK": 64,
            "maxTemperature": 2,
            "thinking": true
        }))
        .unwrap();
        assert_eq!(model.name, "models/gemini-2.5-pro");
        assert_eq!(model.input_token_limit, 1_048_576);
        assert_eq!(model.temperature, Some(1.0));
        assert_eq!(model.top_k, Some(64));
        assert!(model.supports("generateContent"));
        assert!(!model.supports("embedContent"));
        assert!(model.validate().is_ok());
    }

    #[test]
    fn missing_models_defaults_to_empty() {
        let response: ListModelsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.models.is_empty());
        assert!(response.next_page_token.is_none());
    }

    #[test]
    fn field_rules_reject_out_of_range_sampling() {
        let model: WireModel = serde_json::from_value(json!({
            "name": "models/x",
            "displayName": "X",
            "inputTokenLimit": 1,
            "outputTokenLimit": 1,
            "supportedGenerationMethods": [],
            "topP": 1.5
        }))
        .unwrap();
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("top_p"));
    }
}
