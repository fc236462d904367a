//! Override resolution: wire model + claiming rule -> model description.

use std::fmt::Display;

use crate::error::CatalogError;
use crate::providers::gemini::wire::WireModel;
use crate::registry::{CatalogRegistry, ManualEntry, PrefixRule, RuleMatch};
use crate::types::ModelDescription;

const NO_DESCRIPTION: &str = "No description.";

/// Resolves admitted wire models against a registry.
#[derive(Debug, Clone, Copy)]
pub struct OverrideResolver<'a> {
    registry: &'a CatalogRegistry,
}

impl<'a> OverrideResolver<'a> {
    pub fn new(registry: &'a CatalogRegistry) -> Self {
        Self { registry }
    }

    /// Produce exactly one description. A model no rule claims means the
    /// filter and the registry disagree, which is reported as an internal error.
    pub fn resolve(&self, model: &WireModel) -> Result<ModelDescription, CatalogError> {
        match self.registry.claim(&model.name) {
            Some(RuleMatch::Manual { entry, target, .. }) => Ok(from_manual(model, entry, target)),
            Some(RuleMatch::Prefix { rule, .. }) => Ok(from_prefix(model, rule)),
            None => Err(CatalogError::InternalError(format!(
                "[{}] model '{}' passed the allow-list but matches no rule",
                self.registry.provider(),
                model.name
            ))),
        }
    }
}

/// `target` is `entry` itself unless `entry` is an alias.
fn from_manual(model: &WireModel, entry: &ManualEntry, target: &ManualEntry) -> ModelDescription {
    let label = match (&entry.label_override, entry.sym_link.is_some()) {
        (Some(label), _) => label.clone(),
        (None, true) => match &target.label_override {
            Some(target_label) => format!("{target_label} ({})", model.display_name),
            None => model.display_name.clone(),
        },
        (None, false) => model.display_name.clone(),
    };

    ModelDescription {
        id: model.name.clone(),
        label,
        description: long_description(model),
        context_window: context_window(model),
        max_completion_tokens: model.output_token_limit,
        interfaces: target.interfaces.clone(),
        chat_price: target.chat_price.clone(),
        hidden: entry.hidden,
        is_preview: entry.is_preview,
        benchmark: entry.benchmark.or(target.benchmark),
        parameter_specs: target.parameter_specs.clone(),
        deprecated: entry.deprecated.or(target.deprecated),
    }
}

fn from_prefix(model: &WireModel, rule: &PrefixRule) -> ModelDescription {
    let label = if model.name == rule.prefix {
        rule.label.clone()
    } else {
        format!("{} ({})", rule.label, model.display_name)
    };

    ModelDescription {
        id: model.name.clone(),
        label,
        description: long_description(model),
        context_window: context_window(model),
        max_completion_tokens: model.output_token_limit,
        interfaces: rule.interfaces.clone(),
        chat_price: rule.chat_price.clone(),
        hidden: false,
        is_preview: false,
        benchmark: None,
        parameter_specs: None,
        deprecated: None,
    }
}

/// Input limit plus output limit, saturating at `u32::MAX`.
pub fn context_window(model: &WireModel) -> u32 {
    model
        .input_token_limit
        .saturating_add(model.output_token_limit)
}

/// Wire description followed by a trailer with the version, the generation
/// defaults and the raw supported-operation list.
pub fn long_description(model: &WireModel) -> String {
    let base = if model.description.trim().is_empty() {
        NO_DESCRIPTION
    } else {
        model.description.as_str()
    };
    format!(
        "{base} (Version: {}, Defaults: temperature={}, topP={}, topK={}, interfaces=[{}])",
        or_unknown(model.version.as_ref()),
        or_unknown(model.temperature),
        or_unknown(model.top_p),
        or_unknown(model.top_k),
        model.supported_generation_methods.join(",")
    )
}

fn or_unknown<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::types::{
        CachePricing, ModelInterface, ParamId, ParameterSpec, Price, PricingStructure,
    };

    fn wire(name: &str, display: &str, input: u32, output: u32) -> WireModel {
        WireModel {
            name: name.to_string(),
            base_model_id: None,
            version: Some("001".to_string()),
            display_name: display.to_string(),
            description: "A model".to_string(),
            input_token_limit: input,
            output_token_limit: output,
            supported_generation_methods: vec![
                "generateContent".to_string(),
                "countTokens".to_string(),
            ],
            temperature: Some(1.0),
            max_temperature: None,
            top_p: Some(0.95),
            top_k: Some(40),
            thinking: None,
        }
    }

    fn pro_pricing() -> PricingStructure {
        PricingStructure::new(
            Price::tiered([(Some(200_000), 1.25), (None, 2.50)]),
            Price::tiered([(Some(200_000), 10.0), (None, 15.0)]),
        )
        .with_cache(CachePricing::auto_cache(Price::tiered([
            (Some(200_000), 0.31),
            (None, 0.625),
        ])))
    }

    fn registry() -> CatalogRegistry {
        CatalogRegistry::builder("gemini")
            .manual(
                ManualEntry::new(
                    "models/gemini-2.5-pro",
                    vec![ModelInterface::Chat, ModelInterface::Reasoning],
                    pro_pricing(),
                )
                .label("Gemini 2.5 Pro")
                .benchmark(1451)
                .parameter_specs(vec![ParameterSpec::with_range(
                    ParamId::ThinkingBudget,
                    128,
                    32768,
                )]),
            )
            .manual(ManualEntry::alias("models/pro-alias", "models/gemini-2.5-pro").hidden())
            .manual(
                ManualEntry::alias("models/pro-named", "models/gemini-2.5-pro")
                    .label("Pro Named")
                    .preview(),
            )
            .manual(ManualEntry::new(
                "models/plain",
                vec![ModelInterface::Chat],
                PricingStructure::free(),
            ))
            .prefix(PrefixRule::new(
                "models/gemini-2.5-flash-preview",
                "Gemini 2.5 Flash Preview",
                vec![ModelInterface::Chat],
                PricingStructure::new(Price::flat(0.3), Price::flat(2.5)),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn manual_entry_applies_overrides() {
        let registry = registry();
        let resolver = OverrideResolver::new(&registry);
        let model = wire("models/gemini-2.5-pro", "Gemini 2.5 Pro 001", 1_000_000, 65_536);
        let desc = resolver.resolve(&model).unwrap();

        assert_eq!(desc.id, "models/gemini-2.5-pro");
        assert_eq!(desc.label, "Gemini 2.5 Pro");
        assert_eq!(desc.context_window, 1_065_536);
        assert_eq!(desc.max_completion_tokens, 65_536);
        assert_eq!(desc.chat_price, pro_pricing());
        assert!(!desc.hidden);
        assert_eq!(desc.benchmark.map(|b| b.cba_elo), Some(1451));
        assert_eq!(desc.parameter_specs.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            desc.description,
            "A model (Version: 001, Defaults: temperature=1, topP=0.95, topK=40, interfaces=[generateContent,countTokens])"
        );
    }

    #[test]
    fn manual_entry_without_override_uses_display_name() {
        let registry = registry();
        let resolver = OverrideResolver::new(&registry);
        let desc = resolver.resolve(&wire("models/plain", "Plain Model", 10, 5)).unwrap();
        assert_eq!(desc.label, "Plain Model");
        assert_eq!(desc.benchmark, None);
        assert_eq!(desc.parameter_specs, None);
    }

    #[test]
    fn alias_uses_target_attributes_with_own_identity() {
        let registry = registry();
        let resolver = OverrideResolver::new(&registry);
        let target = resolver
            .resolve(&wire("models/gemini-2.5-pro", "Gemini 2.5 Pro", 100, 10))
            .unwrap();

        let alias = resolver
            .resolve(&wire("models/pro-alias", "Pro Latest", 100, 10))
            .unwrap();
        assert_eq!(alias.id, "models/pro-alias");
        assert_eq!(alias.label, "Gemini 2.5 Pro (Pro Latest)");
        assert_eq!(alias.chat_price, target.chat_price);
        assert_eq!(alias.interfaces, target.interfaces);
        assert_eq!(alias.parameter_specs, target.parameter_specs);
        assert!(alias.hidden);
        assert!(!target.hidden);
        assert!(!alias.is_preview);

        let named = resolver
            .resolve(&wire("models/pro-named", "Whatever", 100, 10))
            .unwrap();
        assert_eq!(named.label, "Pro Named");
        assert!(named.is_preview);
        assert!(!target.is_preview);
        assert_eq!(named.chat_price, target.chat_price);
    }

    #[test]
    fn prefix_rule_synthesizes_label_and_drops_extras() {
        let registry = registry();
        let resolver = OverrideResolver::new(&registry);
        let desc = resolver
            .resolve(&wire(
                "models/gemini-2.5-flash-preview-05-20",
                "Gemini 2.5 Flash Preview 05-20",
                1_048_576,
                65_536,
            ))
            .unwrap();
        assert_eq!(
            desc.label,
            "Gemini 2.5 Flash Preview (Gemini 2.5 Flash Preview 05-20)"
        );
        assert_eq!(desc.benchmark, None);
        assert_eq!(desc.parameter_specs, None);
        assert!(!desc.hidden);
        assert!(!desc.is_preview);

        let exact = resolver
            .resolve(&wire("models/gemini-2.5-flash-preview", "Anything", 1, 1))
            .unwrap();
        assert_eq!(exact.label, "Gemini 2.5 Flash Preview");
    }

    #[test]
    fn context_window_saturates() {
        let model = wire("models/plain", "P", u32::MAX - 1, 10);
        assert_eq!(context_window(&model), u32::MAX);
    }

    #[test]
    fn empty_description_gets_placeholder_and_unknown_defaults() {
        let mut model = wire("models/plain", "P", 1, 1);
        model.description = String::new();
        model.version = None;
        model.top_k = None;
        let text = long_description(&model);
        assert!(text.starts_with("No description. (Version: unknown,"));
        assert!(text.contains("topK=unknown"));
    }

    #[test]
    fn unmatched_model_is_an_internal_error() {
        let registry = registry();
        let resolver = OverrideResolver::new(&registry);
        let err = resolver
            .resolve(&wire("models/embedding-001", "Embedding", 1, 1))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(err.to_string().contains("models/embedding-001"));
    }
}
