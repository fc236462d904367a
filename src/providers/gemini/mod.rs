//! Google Gemini (Generative Language API) model catalog.

pub mod access;
pub mod catalog;
pub mod wire;

pub use access::{build_gemini_headers, list_models_request, models_url};
pub use catalog::{CHAT_OPERATION, default_registry};
pub use wire::{ListModelsResponse, WireModel};

/// Provider tag carried by Gemini errors and diagnostics.
pub const PROVIDER: &str = "gemini";
