//! # Siumai Catalog - Curated Model Listings
//!
//! Fetches a provider's model listing, keeps only the models on a curated
//! allow-list, enriches each one with pricing, interfaces and parameter
//! defaults, and returns them in a stable order.
//!
#![deny(unsafe_code)]

//! ## Pipeline
//!
//! 1. fetch every page of the upstream listing
//! 2. validate each page against the wire schema
//! 3. drop denied and unlisted models
//! 4. resolve each survivor against its manual entry or prefix rule
//! 5. sort by rule declaration order, then by label
//!
//! Dev builds (or `SIUMAI_CATALOG_DIAGNOSTICS=1`) also report allow-list
//! entries with no upstream counterpart under the `siumai_catalog::dev`
//! tracing target.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use siumai_catalog::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let access = AccessConfig::gemini_from_env()?;
//!     let models = list_models(&access, &CancellationToken::new()).await?;
//!     for model in visible_models(&models) {
//!         println!("{:<40} {:>9}", model.label, model.context_window);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod defaults;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod registry;
pub mod telemetry;
pub mod transport;
pub mod types;

pub use config::{AccessConfig, CatalogOptions, Dialect, HttpConfig};
pub use dispatch::{CatalogDispatcher, list_models};
pub use error::{CatalogError, ErrorCategory, TransportError};
pub use pipeline::{CatalogListing, CatalogPipeline};
pub use registry::{CatalogRegistry, ManualEntry, PrefixRule};
pub use types::{ModelDescription, ModelInterface, PricingStructure, visible_models};

/// Commonly used items
pub mod prelude {
    pub use crate::config::{AccessConfig, CatalogOptions, Dialect, HttpConfig};
    pub use crate::dispatch::{CatalogDispatcher, list_models};
    pub use crate::error::{CatalogError, TransportError};
    pub use crate::pipeline::CatalogListing;
    pub use crate::registry::{CatalogRegistry, ManualEntry, PrefixRule};
    pub use crate::types::{
        ModelDescription, ModelInterface, ParamId, ParameterSpec, Price, PriceTier,
        PricingStructure, visible_models,
    };
}
