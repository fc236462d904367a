//! Catalog pipeline
//!
//! The synchronous part of a dispatch: validate each fetched page, then filter,
//! resolve and order the accumulated wire models. Diagnostics run as a side
//! channel chosen once at construction.
//!
//! ```text
//! raw page ──validate──▶ WireModel* ──filter──▶ resolve ──▶ order ──▶ ModelDescription*
//!     └──────────── parser-miss / missing-rule diagnostics (dev only) ─────────┘
//! ```

pub mod diagnostics;
pub mod matcher;
pub mod ordering;
pub mod resolve;
pub mod validate;

pub use diagnostics::{ConsistencyCheck, DevDiagnostics, NoDiagnostics};
pub use matcher::{AllowListMatcher, Rejection};
pub use ordering::{OrderingKey, compare_labels, sort_models};
pub use resolve::OverrideResolver;
pub use validate::WireValidator;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::CatalogOptions;
use crate::error::CatalogError;
use crate::providers::gemini::wire::{ListModelsResponse, WireModel};
use crate::registry::CatalogRegistry;
use crate::types::ModelDescription;

/// Result of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogListing {
    pub models: Vec<ModelDescription>,
    /// Diagnostic lines; always empty in production mode
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

/// Validator, registry and diagnostics for one provider.
#[derive(Debug, Clone)]
pub struct CatalogPipeline {
    registry: Arc<CatalogRegistry>,
    validator: Arc<WireValidator>,
    diagnostics: Arc<dyn ConsistencyCheck>,
}

impl CatalogPipeline {
    pub fn new(
        registry: Arc<CatalogRegistry>,
        validator: WireValidator,
        options: &CatalogOptions,
    ) -> Self {
        Self {
            registry,
            validator: Arc::new(validator),
            diagnostics: diagnostics::for_options(options),
        }
    }

    /// Pipeline with the Gemini wire schema.
    pub fn gemini(
        registry: Arc<CatalogRegistry>,
        options: &CatalogOptions,
    ) -> Result<Self, CatalogError> {
        Ok(Self::new(registry, WireValidator::gemini()?, options))
    }

    pub fn registry(&self) -> &CatalogRegistry {
        &self.registry
    }

    pub fn provider(&self) -> &'static str {
        self.registry.provider()
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics.enabled()
    }

    /// Validate one raw page, appending parser-miss lines to `diagnostics`.
    pub fn validate_page(
        &self,
        raw: &Value,
        diagnostics: &mut Vec<String>,
    ) -> Result<ListModelsResponse, CatalogError> {
        match self.validator.parse(raw) {
            Ok(page) => {
                diagnostics.extend(self.diagnostics.parser_misses(
                    self.provider(),
                    raw,
                    page.models.len(),
                ));
                Ok(page)
            }
            Err(e) => {
                diagnostics.extend(self.diagnostics.parser_misses(self.provider(), raw, 0));
                Err(e)
            }
        }
    }

    /// Filter, resolve and order validated wire models.
    pub fn process(
        &self,
        models: &[WireModel],
        mut diagnostics: Vec<String>,
    ) -> Result<CatalogListing, CatalogError> {
        if self.diagnostics.enabled() {
            let ids: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
            diagnostics.extend(self.diagnostics.missing_rules(&self.registry, &ids));
        }

        let admitted = AllowListMatcher::new(&self.registry).filter(models);
        let resolver = OverrideResolver::new(&self.registry);
        let mut resolved = admitted
            .into_iter()
            .map(|model| resolver.resolve(model))
            .collect::<Result<Vec<_>, _>>()?;
        sort_models(&self.registry, &mut resolved);

        tracing::debug!(
            provider = self.provider(),
            upstream = models.len(),
            listed = resolved.len(),
            "catalog pipeline finished"
        );

        Ok(CatalogListing {
            models: resolved,
            diagnostics,
        })
    }

    /// Run a single-page payload end to end.
    pub fn run(&self, raw: &Value) -> Result<CatalogListing, CatalogError> {
        let mut diagnostics = Vec::new();
        let page = self.validate_page(raw, &mut diagnostics)?;
        self.process(&page.models, diagnostics)
    }
}
