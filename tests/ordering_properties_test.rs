//! Property tests for catalog ordering

use std::cmp::Ordering;

use proptest::prelude::*;
use siumai_catalog::pipeline::{compare_labels, sort_models};
use siumai_catalog::prelude::*;

const LABEL: &str = "[A-Za-z0-9 .()-]{0,12}";

fn registry() -> CatalogRegistry {
    CatalogRegistry::builder("gemini")
        .manual(ManualEntry::new(
            "models/gemini-3-pro-preview",
            Vec::new(),
            PricingStructure::free(),
        ))
        .manual(ManualEntry::new("models/gemini-2.5-pro", Vec::new(), PricingStructure::free()))
        .prefix(PrefixRule::new(
            "models/gemini-2.5-flash-preview",
            "Gemini 2.5 Flash Preview",
            Vec::new(),
            PricingStructure::free(),
        ))
        .build()
        .unwrap()
}

fn describe(id: String, label: String) -> ModelDescription {
    ModelDescription {
        id,
        label,
        description: String::new(),
        context_window: 0,
        max_completion_tokens: 0,
        interfaces: Vec::new(),
        chat_price: PricingStructure::free(),
        hidden: false,
        is_preview: false,
        benchmark: None,
        parameter_specs: None,
        deprecated: None,
    }
}

fn model_strategy() -> impl Strategy<Value = Vec<ModelDescription>> {
    let stem = prop_oneof![
        Just("models/gemini-3-pro-preview"),
        Just("models/gemini-2.5-pro"),
        Just("models/gemini-2.5-flash-preview"),
        Just("models/other"),
    ];
    prop::collection::vec((stem, LABEL), 0..24).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (stem, label))| {
                // exact manual ids stay exact for the first of each stem
                let id = if i == 0 { stem.to_string() } else { format!("{stem}-{i}") };
                describe(id, label)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn label_comparison_is_antisymmetric(a in LABEL, b in LABEL) {
        prop_assert_eq!(compare_labels(&a, &b), compare_labels(&b, &a).reverse());
        prop_assert_eq!(compare_labels(&a, &b) == Ordering::Equal, a == b);
    }

    #[test]
    fn label_comparison_is_transitive(a in LABEL, b in LABEL, c in LABEL) {
        let mut labels = [a, b, c];
        labels.sort_by(|x, y| compare_labels(x, y));
        prop_assert_ne!(compare_labels(&labels[0], &labels[1]), Ordering::Greater);
        prop_assert_ne!(compare_labels(&labels[1], &labels[2]), Ordering::Greater);
        prop_assert_ne!(compare_labels(&labels[0], &labels[2]), Ordering::Greater);
    }

    #[test]
    fn sort_ignores_input_order(models in model_strategy()) {
        let registry = registry();
        let mut forward = models.clone();
        let mut backward: Vec<_> = models.into_iter().rev().collect();
        sort_models(&registry, &mut forward);
        sort_models(&registry, &mut backward);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn sort_groups_by_claiming_rule(models in model_strategy()) {
        let registry = registry();
        let mut sorted = models;
        sort_models(&registry, &mut sorted);

        let ranks: Vec<_> = sorted.iter().map(|m| registry.rank(&m.id)).collect();
        for pair in ranks.windows(2) {
            match (pair[0], pair[1]) {
                (Some(a), Some(b)) => prop_assert!(a <= b),
                (None, Some(_)) => prop_assert!(false, "unclaimed model before a claimed one"),
                _ => {}
            }
        }
    }
}
