//! Curated Gemini model table.
//!
//! Declaration order is display order: newer and better models first.
//! Pricing in USD per million tokens, per https://ai.google.dev/pricing
//! (Nov 20, 2025).

use crate::error::CatalogError;
use crate::registry::{CatalogRegistry, ManualEntry, PrefixRule};
use crate::types::{
    CachePricing, ModelInterface as If, ParamId, ParameterSpec, Price, PricingStructure,
};

use super::PROVIDER;

/// Generation method every listed Gemini model must support.
pub const CHAT_OPERATION: &str = "generateContent";

/// Upstream ids that do not point at what their name says.
const DENIED_IDS: [&str; 6] = [
    // vague rolling aliases; the user should pick the concrete model
    "models/gemini-pro-latest",
    "models/gemini-flash-latest",
    "models/gemini-flash-lite-latest",
    // re-pointed to paid models
    "models/gemini-2.0-flash-exp",
    "models/gemini-1.5-flash-8b-exp-0924",
    "models/gemini-1.5-flash-8b-exp-0827",
];

const DENIED_LABEL_FRAGMENTS: [&str; 1] = ["Legacy"];

const IF_25: [If; 7] = [
    If::Chat,
    If::Vision,
    If::FunctionCalling,
    If::Json,
    If::Reasoning,
    If::CodeExecution,
    If::PromptCaching,
];

const IF_30: [If; 8] = [
    If::HotfixNoTemperature,
    If::Chat,
    If::Vision,
    If::FunctionCalling,
    If::Json,
    If::Reasoning,
    If::CodeExecution,
    If::PromptCaching,
];

const IF_30_IMG: [If; 9] = [
    If::HotfixNoTemperature,
    If::Chat,
    If::Vision,
    If::FunctionCalling,
    If::Json,
    If::Reasoning,
    If::CodeExecution,
    If::PromptCaching,
    If::OutputsImage,
];

const IF_TTS: [If; 8] = [
    If::Chat,
    If::Vision,
    If::FunctionCalling,
    If::Json,
    If::OutputsAudio,
    If::OutputsNoText,
    If::HotfixStripSys0,
    If::HotfixNoStream,
];

const IF_IMAGE: [If; 5] = [
    If::Chat,
    If::Vision,
    If::FunctionCalling,
    If::Json,
    If::OutputsImage,
];

const IF_20_EXP: [If; 5] = [
    If::Chat,
    If::Vision,
    If::FunctionCalling,
    If::Json,
    If::CodeExecution,
];

const IF_PREVIEW_FAMILY: [If; 5] = [
    If::Chat,
    If::FunctionCalling,
    If::Vision,
    If::Json,
    If::CodeExecution,
];

/// Above this prompt size the long-context rate applies.
const LONG_CONTEXT: u64 = 200_000;

fn tiered(short: f64, long: f64) -> Price {
    Price::tiered([(Some(LONG_CONTEXT), short), (None, long)])
}

fn gemini_30_pro_pricing() -> PricingStructure {
    PricingStructure::new(tiered(2.00, 4.00), tiered(12.00, 18.00))
        .with_cache(CachePricing::auto_cache(tiered(0.20, 0.40)))
}

fn gemini_30_pro_image_pricing() -> PricingStructure {
    PricingStructure::new(Price::flat(2.00), Price::flat(12.00))
}

fn gemini_25_pro_pricing() -> PricingStructure {
    PricingStructure::new(tiered(1.25, 2.50), tiered(10.00, 15.00))
        .with_cache(CachePricing::auto_cache(tiered(0.31, 0.625)))
}

fn gemini_25_flash_pricing() -> PricingStructure {
    PricingStructure::new(Price::flat(0.30), Price::flat(2.50))
        .with_cache(CachePricing::auto_cache(Price::flat(0.075)))
}

fn gemini_25_flash_lite_pricing() -> PricingStructure {
    PricingStructure::new(Price::flat(0.10), Price::flat(0.40))
        .with_cache(CachePricing::auto_cache(Price::flat(0.025)))
}

fn thinking_and_search() -> [ParameterSpec; 2] {
    [
        ParameterSpec::new(ParamId::ThinkingBudget),
        ParameterSpec::new(ParamId::GoogleSearch),
    ]
}

/// The default Gemini registry.
pub fn default_registry() -> Result<CatalogRegistry, CatalogError> {
    let mut builder = CatalogRegistry::builder(PROVIDER).require_operation(CHAT_OPERATION);
    for id in DENIED_IDS {
        builder = builder.deny_id(id);
    }
    for fragment in DENIED_LABEL_FRAGMENTS {
        builder = builder.deny_label_fragment(fragment);
    }

    builder
        // Generation 3.0
        .manual(
            ManualEntry::new("models/gemini-3-pro-preview", IF_30, gemini_30_pro_pricing())
                .label("Gemini 3 Pro Preview")
                .preview()
                .parameter_specs([
                    ParameterSpec::new(ParamId::ThinkingLevel),
                    ParameterSpec::new(ParamId::MediaResolution),
                    ParameterSpec::new(ParamId::CodeExecution),
                    ParameterSpec::new(ParamId::GoogleSearch),
                ])
                .benchmark(1498),
        )
        .manual(
            ManualEntry::new(
                "models/gemini-3-pro-image-preview",
                IF_30_IMG,
                gemini_30_pro_image_pricing(),
            )
            .label("Nano Banana Pro")
            .preview()
            .parameter_specs([
                ParameterSpec::new(ParamId::GoogleSearch),
                ParameterSpec::new(ParamId::AspectRatio),
                ParameterSpec::new(ParamId::ImageSize),
            ]),
        )
        .manual(
            ManualEntry::alias(
                "models/nano-banana-pro-preview",
                "models/gemini-3-pro-image-preview",
            )
            .label("Nano Banana Pro")
            .preview(),
        )
        // Generation 2.5
        .manual(
            ManualEntry::new("models/gemini-2.5-pro", IF_25, gemini_25_pro_pricing())
                .label("Gemini 2.5 Pro")
                .parameter_specs([
                    // 0 would turn thinking off, which this model does not support
                    ParameterSpec::with_range(ParamId::ThinkingBudget, 128, 32768),
                    ParameterSpec::new(ParamId::GoogleSearch),
                ])
                .benchmark(1451),
        )
        .manual(
            ManualEntry::new(
                "models/gemini-2.5-pro-preview-06-05",
                IF_25,
                gemini_25_pro_pricing(),
            )
            .label("Gemini 2.5 Pro Preview 06-05")
            .preview()
            .hidden()
            .parameter_specs([ParameterSpec::with_range(ParamId::ThinkingBudget, 128, 32768)]),
        )
        .manual(
            ManualEntry::new(
                "models/gemini-2.5-pro-preview-05-06",
                IF_25,
                gemini_25_pro_pricing(),
            )
            .preview()
            .hidden(),
        )
        .manual(
            ManualEntry::new(
                "models/gemini-2.5-pro-preview-03-25",
                IF_25,
                gemini_25_pro_pricing(),
            )
            .preview()
            .hidden(),
        )
        .manual(
            ManualEntry::new(
                "models/gemini-2.5-pro-preview-tts",
                IF_TTS,
                PricingStructure::input_only(Price::flat(1.00)),
            )
            .preview()
            .hidden(),
        )
        .manual(
            ManualEntry::new(
                "models/gemini-2.5-flash-preview-09-2025",
                IF_25,
                gemini_25_flash_pricing(),
            )
            .label("Gemini 2.5 Flash Preview 09-2025")
            .preview()
            .parameter_specs(thinking_and_search())
            // one point above the stable 2.5 Flash so the preview ranks first
            .benchmark(1408),
        )
        .manual(
            ManualEntry::new("models/gemini-2.5-flash", IF_25, gemini_25_flash_pricing())
                .label("Gemini 2.5 Flash")
                .hidden()
                .parameter_specs(thinking_and_search())
                .benchmark(1407),
        )
        .manual(
            ManualEntry::new(
                "models/gemini-2.5-computer-use-preview-10-2025",
                [
                    If::Chat,
                    If::Vision,
                    If::FunctionCalling,
                    If::Json,
                    If::Reasoning,
                    If::CodeExecution,
                ],
                gemini_25_pro_pricing(),
            )
            .label("Gemini 2.5 Computer Use Preview 10-2025")
            .preview()
            // needs client-side browser automation
            .hidden()
            .parameter_specs([
                ParameterSpec::new(ParamId::ThinkingBudget),
                ParameterSpec::new(ParamId::ComputerUse),
            ]),
        )
        .manual(
            ManualEntry::new(
                "models/gemini-robotics-er-1.5-preview",
                [
                    If::Chat,
                    If::Vision,
                    If::FunctionCalling,
                    If::Json,
                    If::Reasoning,
                ],
                gemini_25_flash_pricing(),
            )
            .label("Gemini Robotics-ER 1.5 Preview")
            .preview()
            .parameter_specs([ParameterSpec::new(ParamId::ThinkingBudget)]),
        )
        .manual(
            ManualEntry::new(
                "models/gemini-2.5-flash-image",
                IF_IMAGE,
                PricingStructure::input_only(Price::flat(0.30)),
            )
            .label("Nano Banana")
            .parameter_specs([ParameterSpec::new(ParamId::AspectRatio)]),
        )
        .manual(
            ManualEntry::new(
                "models/gemini-2.5-flash-image-preview",
                IF_IMAGE,
                PricingStructure::input_only(Price::flat(0.30)),
            )
            .label("Gemini 2.5 Flash Image Preview")
            .preview()
            .hidden(),
        )
        .manual(
            ManualEntry::new(
                "models/gemini-2.5-flash-preview-tts",
                IF_TTS,
                PricingStructure::input_only(Price::flat(0.50)),
            )
            .preview()
            .hidden(),
        )
        .manual(
            ManualEntry::new(
                "models/gemini-2.5-flash-lite-preview-09-2025",
                IF_25,
                gemini_25_flash_lite_pricing(),
            )
            .label("Gemini 2.5 Flash-Lite Preview 09-2025")
            .preview()
            .parameter_specs(thinking_and_search())
            .benchmark(1380),
        )
        .manual(
            ManualEntry::new(
                "models/gemini-2.5-flash-lite",
                IF_25,
                gemini_25_flash_lite_pricing(),
            )
            .label("Gemini 2.5 Flash-Lite")
            .hidden()
            .parameter_specs(thinking_and_search())
            .benchmark(1310),
        )
        // Generation 2.0
        .manual(
            ManualEntry::new(
                "models/gemini-2.0-pro-exp-02-05",
                IF_20_EXP,
                PricingStructure::free(),
            )
            .preview()
            .hidden()
            .benchmark(1380),
        )
        .manual(
            ManualEntry::alias("models/gemini-2.0-pro-exp", "models/gemini-2.0-pro-exp-02-05")
                .preview()
                .hidden(),
        )
        .manual(
            ManualEntry::new("models/gemini-exp-1206", IF_20_EXP, PricingStructure::free())
                .label("Gemini 2.0 Pro Experimental 1206")
                .preview()
                .hidden()
                .benchmark(1374),
        )
        .manual(
            ManualEntry::new(
                "models/gemini-2.0-flash-live-001",
                [
                    If::Chat,
                    If::Vision,
                    If::FunctionCalling,
                    If::Json,
                    If::OutputsAudio,
                    If::CodeExecution,
                ],
                PricingStructure::new(Price::flat(0.35), Price::flat(1.50)),
            )
            .label("Gemini 2.0 Flash Live")
            .preview(),
        )
        // Families without individual curation
        .prefix(PrefixRule::new(
            "models/gemini-2.5-flash-preview",
            "Gemini 2.5 Flash Preview",
            IF_PREVIEW_FAMILY,
            gemini_25_flash_pricing(),
        ))
        .prefix(PrefixRule::new(
            "models/gemini-2.5-flash-lite-preview",
            "Gemini 2.5 Flash Lite Preview",
            IF_PREVIEW_FAMILY,
            gemini_25_flash_lite_pricing(),
        ))
        .build()
}
