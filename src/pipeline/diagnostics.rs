//! Consistency diagnostics (development side channel).
//!
//! The implementation is picked once from [`CatalogOptions`]; production
//! pipelines hold [`NoDiagnostics`] and never inspect payloads for it.
//! Diagnostics only log and report lines, they never change the result.

use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;

use crate::config::CatalogOptions;
use crate::registry::CatalogRegistry;

/// Log target of diagnostic lines.
pub const DIAGNOSTICS_TARGET: &str = "siumai_catalog::dev";

/// Cross-checks between the allow-list and a live payload.
pub trait ConsistencyCheck: Send + Sync + Debug {
    /// One line per rule that matches none of `upstream_ids`.
    fn missing_rules(&self, registry: &CatalogRegistry, upstream_ids: &[&str]) -> Vec<String>;

    /// A line when `raw` lacks a `models` array or its length differs from
    /// `parsed`.
    fn parser_misses(&self, provider: &str, raw: &Value, parsed: usize) -> Vec<String>;

    fn enabled(&self) -> bool;
}

/// Pick the implementation for `options`.
pub fn for_options(options: &CatalogOptions) -> Arc<dyn ConsistencyCheck> {
    if options.diagnostics {
        Arc::new(DevDiagnostics)
    } else {
        Arc::new(NoDiagnostics)
    }
}

/// Logs to [`DIAGNOSTICS_TARGET`] at `warn` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct DevDiagnostics;

impl ConsistencyCheck for DevDiagnostics {
    fn missing_rules(&self, registry: &CatalogRegistry, upstream_ids: &[&str]) -> Vec<String> {
        let lines: Vec<String> = registry
            .rules()
            .iter()
            .filter(|rule| !upstream_ids.iter().any(|id| rule.matches(id)))
            .map(|rule| {
                format!(
                    "[DEV] {}: allow-listed {} '{}' has no match in the upstream payload",
                    registry.provider(),
                    rule.kind(),
                    rule.key()
                )
            })
            .collect();
        for line in &lines {
            tracing::warn!(target: DIAGNOSTICS_TARGET, "{line}");
        }
        lines
    }

    fn parser_misses(&self, provider: &str, raw: &Value, parsed: usize) -> Vec<String> {
        let line = match raw.get("models").and_then(Value::as_array) {
            None => Some(format!(
                "[DEV] {provider}: payload field 'models' is not an array"
            )),
            Some(models) if models.len() != parsed => Some(format!(
                "[DEV] {provider}: parsed models length mismatch (raw {}, parsed {parsed})",
                models.len()
            )),
            Some(_) => None,
        };
        if let Some(line) = &line {
            tracing::warn!(target: DIAGNOSTICS_TARGET, "{line}");
        }
        line.into_iter().collect()
    }

    fn enabled(&self) -> bool {
        true
    }
}

/// Production implementation: does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiagnostics;

impl ConsistencyCheck for NoDiagnostics {
    fn missing_rules(&self, _registry: &CatalogRegistry, _upstream_ids: &[&str]) -> Vec<String> {
        Vec::new()
    }

    fn parser_misses(&self, _provider: &str, _raw: &Value, _parsed: usize) -> Vec<String> {
        Vec::new()
    }

    fn enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ManualEntry, PrefixRule};
    use crate::types::PricingStructure;
    use serde_json::json;
    use tracing_test::traced_test;

    fn registry() -> CatalogRegistry {
        CatalogRegistry::builder("gemini")
            .manual(ManualEntry::new("models/pro", Vec::new(), PricingStructure::free()))
            .prefix(PrefixRule::new("models/flash", "Flash", Vec::new(), PricingStructure::free()))
            .prefix(PrefixRule::new("models/gone", "Gone", Vec::new(), PricingStructure::free()))
            .build()
            .unwrap()
    }

    #[test]
    #[traced_test]
    fn missing_rule_emits_one_line_per_rule() {
        let registry = registry();
        let lines = DevDiagnostics.missing_rules(&registry, &["models/pro", "models/flash-001"]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("'models/gone'"));
        assert!(logs_contain("allow-listed prefix 'models/gone'"));
    }

    #[test]
    fn production_mode_is_silent() {
        let registry = registry();
        let check = for_options(&CatalogOptions::production());
        assert!(!check.enabled());
        assert!(check.missing_rules(&registry, &[]).is_empty());
        assert!(check.parser_misses("gemini", &json!({}), 0).is_empty());
    }

    #[test]
    fn parser_miss_detects_shape_and_count() {
        let check = for_options(&CatalogOptions::diagnostic());
        assert!(check.enabled());

        let not_array = check.parser_misses("gemini", &json!({ "models": {} }), 0);
        assert_eq!(not_array.len(), 1);
        assert!(not_array[0].contains("not an array"));

        let mismatch = check.parser_misses("gemini", &json!({ "models": [1, 2, 3] }), 2);
        assert_eq!(mismatch.len(), 1);
        assert!(mismatch[0].contains("raw 3, parsed 2"));

        assert!(check.parser_misses("gemini", &json!({ "models": [1] }), 1).is_empty());
    }
}
