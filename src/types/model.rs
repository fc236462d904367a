//! Normalized model description types handed to the UI layer.

use serde::{Deserialize, Serialize};

use super::pricing::PricingStructure;

/// Capability interfaces a model exposes to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelInterface {
    #[serde(rename = "oai-chat")]
    Chat,
    #[serde(rename = "oai-chat-vision")]
    Vision,
    #[serde(rename = "oai-chat-fn")]
    FunctionCalling,
    #[serde(rename = "oai-chat-json")]
    Json,
    #[serde(rename = "oai-chat-reasoning")]
    Reasoning,
    #[serde(rename = "oai-prompt-caching")]
    PromptCaching,
    #[serde(rename = "gem-code-execution")]
    CodeExecution,
    #[serde(rename = "outputs-image")]
    OutputsImage,
    #[serde(rename = "outputs-audio")]
    OutputsAudio,
    #[serde(rename = "outputs-no-text")]
    OutputsNoText,
    /// Do not send a temperature
    #[serde(rename = "hotfix-no-temperature")]
    HotfixNoTemperature,
    /// Strip the first system message
    #[serde(rename = "hotfix-strip-sys0")]
    HotfixStripSys0,
    /// Streaming is not supported
    #[serde(rename = "hotfix-no-stream")]
    HotfixNoStream,
}

/// Vendor parameters a model accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamId {
    #[serde(rename = "llmVndGeminiThinkingBudget")]
    ThinkingBudget,
    #[serde(rename = "llmVndGeminiThinkingLevel")]
    ThinkingLevel,
    #[serde(rename = "llmVndGeminiMediaResolution")]
    MediaResolution,
    #[serde(rename = "llmVndGeminiCodeExecution")]
    CodeExecution,
    #[serde(rename = "llmVndGeminiGoogleSearch")]
    GoogleSearch,
    #[serde(rename = "llmVndGeminiAspectRatio")]
    AspectRatio,
    #[serde(rename = "llmVndGeminiImageSize")]
    ImageSize,
    #[serde(rename = "llmVndGeminiComputerUse")]
    ComputerUse,
}

/// A parameter exposed for a model, optionally with a narrowed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    pub param_id: ParamId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub range_override: Option<(i64, i64)>,
}

impl ParameterSpec {
    pub const fn new(param_id: ParamId) -> Self {
        Self {
            param_id,
            range_override: None,
        }
    }

    pub const fn with_range(param_id: ParamId, min: i64, max: i64) -> Self {
        Self {
            param_id,
            range_override: Some((min, max)),
        }
    }
}

/// Public benchmark score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benchmark {
    /// Chatbot Arena ELO
    #[serde(rename = "cbaElo")]
    pub cba_elo: u32,
}

impl Benchmark {
    pub const fn elo(cba_elo: u32) -> Self {
        Self { cba_elo }
    }
}

/// A normalized, curated model description.
///
/// `hidden` models are resolvable by id but excluded from default listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescription {
    pub id: String,
    pub label: String,
    pub description: String,
    /// Input limit plus output limit
    pub context_window: u32,
    pub max_completion_tokens: u32,
    pub interfaces: Vec<ModelInterface>,
    pub chat_price: PricingStructure,
    pub hidden: bool,
    /// Preview or experimental release
    #[serde(default)]
    pub is_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub benchmark: Option<Benchmark>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parameter_specs: Option<Vec<ParameterSpec>>,
    /// Announced shutdown date
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deprecated: Option<chrono::NaiveDate>,
}

impl ModelDescription {
    pub fn has_interface(&self, interface: ModelInterface) -> bool {
        self.interfaces.contains(&interface)
    }
}

/// Drop hidden models, keeping order. Used for default listings.
pub fn visible_models(models: &[ModelDescription]) -> Vec<&ModelDescription> {
    models.iter().filter(|m| !m.hidden).collect()
}
