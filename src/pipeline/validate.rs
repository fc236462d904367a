//! Wire schema validation.
//!
//! A payload either validates completely or the whole batch is rejected: a
//! malformed record usually means the upstream contract changed, and a partial
//! list would silently hide models.

use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::CatalogError;
use crate::providers::gemini::wire::{ListModelsResponse, list_models_schema};

/// Maximum number of schema violations quoted in an error message.
const MAX_REPORTED_ERRORS: usize = 3;

/// Validates raw listing payloads. Compile once, reuse across calls.
pub struct WireValidator {
    provider: &'static str,
    schema: jsonschema::Validator,
}

impl std::fmt::Debug for WireValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireValidator")
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl WireValidator {
    /// Validator for the Gemini listing payload.
    pub fn gemini() -> Result<Self, CatalogError> {
        Self::with_schema("gemini", &list_models_schema())
    }

    pub fn with_schema(provider: &'static str, schema: &Value) -> Result<Self, CatalogError> {
        let schema = jsonschema::validator_for(schema).map_err(|e| {
            CatalogError::ConfigurationError(format!("Invalid {provider} wire schema: {e}"))
        })?;
        Ok(Self { provider, schema })
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// Parse one page. Any violation fails the whole page.
    pub fn parse(&self, raw: &Value) -> Result<ListModelsResponse, CatalogError> {
        if self.schema.validate(raw).is_err() {
            let msgs: Vec<String> = self
                .schema
                .iter_errors(raw)
                .take(MAX_REPORTED_ERRORS)
                .map(|err| format!("{} at {}", err, err.instance_path))
                .collect();
            return Err(CatalogError::validation(self.provider, msgs.join("; ")));
        }

        let response = ListModelsResponse::deserialize(raw)
            .map_err(|e| CatalogError::validation(self.provider, e.to_string()))?;

        for (index, model) in response.models.iter().enumerate() {
            model.validate().map_err(|e| {
                CatalogError::validation(
                    self.provider,
                    format!("models[{index}] ({}): {e}", model.name),
                )
            })?;
        }

        tracing::debug!(
            provider = self.provider,
            count = response.models.len(),
            "validated models payload"
        );
        Ok(response)
    }
}
