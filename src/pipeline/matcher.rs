//! Allow-list filtering.

use std::fmt;

use crate::providers::gemini::wire::WireModel;
use crate::registry::CatalogRegistry;

/// Why a wire model was dropped before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Identifier is on the deny-list
    DeniedId,
    /// Display name contains a denied fragment
    DeniedLabel,
    /// The model does not support the required operation
    MissingOperation,
    /// No manual entry or family prefix claims the identifier
    NotAllowed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::DeniedId => "denied id",
            Self::DeniedLabel => "denied display name",
            Self::MissingOperation => "missing required operation",
            Self::NotAllowed => "not allow-listed",
        };
        f.write_str(reason)
    }
}

/// Filters wire models against a registry.
#[derive(Debug, Clone, Copy)]
pub struct AllowListMatcher<'a> {
    registry: &'a CatalogRegistry,
}

impl<'a> AllowListMatcher<'a> {
    pub fn new(registry: &'a CatalogRegistry) -> Self {
        Self { registry }
    }

    /// Pure allow-list predicate: exact manual id or family prefix.
    pub fn is_allowed(&self, model: &WireModel) -> bool {
        self.registry.is_allowed(&model.name)
    }

    /// The first reason to drop `model`, if any. Deny rules run before the
    /// allow-list so a denied id never reaches the resolver.
    pub fn rejection(&self, model: &WireModel) -> Option<Rejection> {
        if self.registry.is_denied_id(&model.name) {
            return Some(Rejection::DeniedId);
        }
        if self.registry.is_denied_label(&model.display_name) {
            return Some(Rejection::DeniedLabel);
        }
        if let Some(operation) = self.registry.required_operation()
            && !model.supports(operation)
        {
            return Some(Rejection::MissingOperation);
        }
        if !self.is_allowed(model) {
            return Some(Rejection::NotAllowed);
        }
        None
    }

    /// Keep admitted models in upstream order.
    pub fn filter<'m>(&self, models: &'m [WireModel]) -> Vec<&'m WireModel> {
        models
            .iter()
            .filter(|model| match self.rejection(model) {
                None => true,
                Some(reason) => {
                    tracing::trace!(
                        provider = self.registry.provider(),
                        model = %model.name,
                        %reason,
                        "dropping model"
                    );
                    false
                }
            })
            .collect()
    }
}
