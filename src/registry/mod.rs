//! Catalog registry
//!
//! An immutable, explicitly constructed allow-list table. The registry is
//! passed into the pipeline rather than read from a module-level static, so
//! tests can run against alternate tables.
//!
//! Construction happens in two passes:
//! 1. index every rule by key, rejecting empty or duplicate keys and invalid
//!    pricing
//! 2. resolve every alias (`sym_link`) to its target entry
//!
//! A dangling or chained alias is a configuration error raised by
//! [`CatalogRegistryBuilder::build`], never at request time.

mod rules;

pub use rules::{AllowListRule, ManualEntry, PrefixRule};

use std::collections::{HashMap, HashSet};

use crate::error::CatalogError;

/// The rule that claims an identifier.
#[derive(Debug, Clone, Copy)]
pub enum RuleMatch<'a> {
    /// An exact entry. `target` is the entry itself unless `entry` is an alias.
    Manual {
        index: usize,
        entry: &'a ManualEntry,
        target: &'a ManualEntry,
    },
    Prefix { index: usize, rule: &'a PrefixRule },
}

impl RuleMatch<'_> {
    /// Declaration index of the claiming rule.
    pub fn index(&self) -> usize {
        match self {
            Self::Manual { index, .. } | Self::Prefix { index, .. } => *index,
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, Self::Manual { entry, .. } if entry.sym_link.is_some())
    }
}

/// Immutable allow-list table with resolved aliases.
#[derive(Debug, Clone)]
pub struct CatalogRegistry {
    provider: &'static str,
    rules: Vec<AllowListRule>,
    /// Manual entry id -> rule index
    manual: HashMap<String, usize>,
    /// Alias rule index -> target rule index
    links: HashMap<usize, usize>,
    deny_ids: HashSet<String>,
    deny_label_fragments: Vec<String>,
    required_operation: Option<String>,
}

impl CatalogRegistry {
    pub fn builder(provider: &'static str) -> CatalogRegistryBuilder {
        CatalogRegistryBuilder::new(provider)
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[AllowListRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True iff `id` equals a manual entry id or starts with a family prefix.
    pub fn is_allowed(&self, id: &str) -> bool {
        self.manual.contains_key(id)
            || self
                .prefix_rules()
                .any(|(_, rule)| id.starts_with(rule.prefix.as_str()))
    }

    /// Find the rule that owns `id`. Manual entries win over family rules;
    /// among family rules the first declared one wins.
    pub fn claim(&self, id: &str) -> Option<RuleMatch<'_>> {
        if let Some(&index) = self.manual.get(id) {
            let AllowListRule::Manual(entry) = &self.rules[index] else {
                return None;
            };
            let target_index = self.links.get(&index).copied().unwrap_or(index);
            let AllowListRule::Manual(target) = &self.rules[target_index] else {
                return None;
            };
            return Some(RuleMatch::Manual {
                index,
                entry,
                target,
            });
        }
        self.prefix_rules()
            .find(|(_, rule)| id.starts_with(rule.prefix.as_str()))
            .map(|(index, rule)| RuleMatch::Prefix { index, rule })
    }

    /// Declaration index used for ordering; `None` sorts last.
    pub fn rank(&self, id: &str) -> Option<usize> {
        self.claim(id).map(|m| m.index())
    }

    pub fn is_denied_id(&self, id: &str) -> bool {
        self.deny_ids.contains(id)
    }

    pub fn is_denied_label(&self, display_name: &str) -> bool {
        self.deny_label_fragments
            .iter()
            .any(|fragment| display_name.contains(fragment.as_str()))
    }

    pub fn required_operation(&self) -> Option<&str> {
        self.required_operation.as_deref()
    }

    fn prefix_rules(&self) -> impl Iterator<Item = (usize, &PrefixRule)> {
        self.rules.iter().enumerate().filter_map(|(i, rule)| match rule {
            AllowListRule::Prefix(p) => Some((i, p)),
            AllowListRule::Manual(_) => None,
        })
    }
}

/// Builder for [`CatalogRegistry`].
#[derive(Debug, Clone)]
pub struct CatalogRegistryBuilder {
    provider: &'static str,
    rules: Vec<AllowListRule>,
    deny_ids: Vec<String>,
    deny_label_fragments: Vec<String>,
    required_operation: Option<String>,
}

impl CatalogRegistryBuilder {
    pub fn new(provider: &'static str) -> Self {
        Self {
            provider,
            rules: Vec::new(),
            deny_ids: Vec::new(),
            deny_label_fragments: Vec::new(),
            required_operation: None,
        }
    }

    pub fn manual(mut self, entry: ManualEntry) -> Self {
        self.rules.push(AllowListRule::Manual(entry));
        self
    }

    pub fn prefix(mut self, rule: PrefixRule) -> Self {
        self.rules.push(AllowListRule::Prefix(rule));
        self
    }

    pub fn rule(mut self, rule: impl Into<AllowListRule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Drop an upstream identifier outright, whatever rule it would match.
    pub fn deny_id(mut self, id: impl Into<String>) -> Self {
        self.deny_ids.push(id.into());
        self
    }

    /// Drop upstream models whose display name contains `fragment`.
    pub fn deny_label_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.deny_label_fragments.push(fragment.into());
        self
    }

    /// Drop upstream models that do not list `operation` among their methods.
    pub fn require_operation(mut self, operation: impl Into<String>) -> Self {
        self.required_operation = Some(operation.into());
        self
    }

    pub fn build(self) -> Result<CatalogRegistry, CatalogError> {
        let provider = self.provider;
        let config_err =
            |msg: String| CatalogError::ConfigurationError(format!("[{provider}] {msg}"));

        // Pass 1: index keys.
        let mut manual = HashMap::new();
        let mut prefixes = HashSet::new();
        for (index, rule) in self.rules.iter().enumerate() {
            let key = rule.key();
            if key.trim().is_empty() {
                return Err(config_err(format!(
                    "rule #{index} has an empty {} key",
                    rule.kind()
                )));
            }
            rule.chat_price()
                .validate()
                .map_err(|e| config_err(format!("rule '{key}' has invalid pricing: {e}")))?;
            let fresh = match rule {
                AllowListRule::Manual(_) => manual.insert(key.to_string(), index).is_none(),
                AllowListRule::Prefix(_) => prefixes.insert(key.to_string()),
            };
            if !fresh {
                return Err(config_err(format!("duplicate {} rule '{key}'", rule.kind())));
            }
        }

        // Pass 2: resolve aliases against the finished index.
        let mut links = HashMap::new();
        for (index, rule) in self.rules.iter().enumerate() {
            let AllowListRule::Manual(entry) = rule else {
                continue;
            };
            let Some(target_id) = entry.sym_link.as_deref() else {
                continue;
            };
            if target_id == entry.id {
                return Err(config_err(format!("'{}' is an alias of itself", entry.id)));
            }
            let &target_index = manual.get(target_id).ok_or_else(|| {
                config_err(format!(
                    "'{}' is an alias of unknown entry '{target_id}'",
                    entry.id
                ))
            })?;
            if let AllowListRule::Manual(target) = &self.rules[target_index]
                && target.sym_link.is_some()
            {
                return Err(config_err(format!(
                    "'{}' is an alias of '{target_id}', which is itself an alias",
                    entry.id
                )));
            }
            links.insert(index, target_index);
        }

        tracing::debug!(
            provider,
            rules = self.rules.len(),
            aliases = links.len(),
            "built catalog registry"
        );

        Ok(CatalogRegistry {
            provider,
            rules: self.rules,
            manual,
            links,
            deny_ids: self.deny_ids.into_iter().collect(),
            deny_label_fragments: self.deny_label_fragments,
            required_operation: self.required_operation,
        })
    }
}
