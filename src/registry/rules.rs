//! Allow-list rule definitions.

use chrono::NaiveDate;

use crate::types::{Benchmark, ModelInterface, ParameterSpec, PricingStructure};

/// A curated entry for one exact upstream identifier.
///
/// Optional attributes are spelled out with explicit defaults: `hidden` is
/// `false` and `benchmark`/`parameter_specs`/`deprecated` are `None` unless a
/// setter says otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualEntry {
    pub id: String,
    pub label_override: Option<String>,
    pub interfaces: Vec<ModelInterface>,
    pub chat_price: PricingStructure,
    /// Alias target; pricing, interfaces and parameter specs come from it
    pub sym_link: Option<String>,
    pub hidden: bool,
    pub is_preview: bool,
    pub deprecated: Option<NaiveDate>,
    pub benchmark: Option<Benchmark>,
    pub parameter_specs: Option<Vec<ParameterSpec>>,
}

impl ManualEntry {
    pub fn new(
        id: impl Into<String>,
        interfaces: impl Into<Vec<ModelInterface>>,
        chat_price: PricingStructure,
    ) -> Self {
        Self {
            id: id.into(),
            label_override: None,
            interfaces: interfaces.into(),
            chat_price,
            sym_link: None,
            hidden: false,
            is_preview: false,
            deprecated: None,
            benchmark: None,
            parameter_specs: None,
        }
    }

    /// An alias of `target`. It carries no attributes of its own besides
    /// identity, label and visibility.
    pub fn alias(id: impl Into<String>, target: impl Into<String>) -> Self {
        let mut entry = Self::new(id, Vec::new(), PricingStructure::default());
        entry.sym_link = Some(target.into());
        entry
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label_override = Some(label.into());
        self
    }

    pub fn sym_link(mut self, target: impl Into<String>) -> Self {
        self.sym_link = Some(target.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn preview(mut self) -> Self {
        self.is_preview = true;
        self
    }

    pub fn deprecated(mut self, date: NaiveDate) -> Self {
        self.deprecated = Some(date);
        self
    }

    pub fn benchmark(mut self, cba_elo: u32) -> Self {
        self.benchmark = Some(Benchmark::elo(cba_elo));
        self
    }

    pub fn parameter_specs(mut self, specs: impl Into<Vec<ParameterSpec>>) -> Self {
        self.parameter_specs = Some(specs.into());
        self
    }
}

/// A family rule matching every identifier that starts with `prefix`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixRule {
    pub prefix: String,
    pub label: String,
    pub interfaces: Vec<ModelInterface>,
    pub chat_price: PricingStructure,
}

impl PrefixRule {
    pub fn new(
        prefix: impl Into<String>,
        label: impl Into<String>,
        interfaces: impl Into<Vec<ModelInterface>>,
        chat_price: PricingStructure,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            label: label.into(),
            interfaces: interfaces.into(),
            chat_price,
        }
    }
}

/// One row of the allow-list table.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowListRule {
    Manual(ManualEntry),
    Prefix(PrefixRule),
}

impl AllowListRule {
    /// The identifier or prefix this rule is keyed by.
    pub fn key(&self) -> &str {
        match self {
            Self::Manual(entry) => &entry.id,
            Self::Prefix(rule) => &rule.prefix,
        }
    }

    /// Exact match for manual entries, prefix match for family rules.
    pub fn matches(&self, id: &str) -> bool {
        match self {
            Self::Manual(entry) => entry.id == id,
            Self::Prefix(rule) => id.starts_with(rule.prefix.as_str()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Manual(_) => "manual",
            Self::Prefix(_) => "prefix",
        }
    }

    pub fn chat_price(&self) -> &PricingStructure {
        match self {
            Self::Manual(entry) => &entry.chat_price,
            Self::Prefix(rule) => &rule.chat_price,
        }
    }
}

impl From<ManualEntry> for AllowListRule {
    fn from(entry: ManualEntry) -> Self {
        Self::Manual(entry)
    }
}

impl From<PrefixRule> for AllowListRule {
    fn from(rule: PrefixRule) -> Self {
        Self::Prefix(rule)
    }
}
