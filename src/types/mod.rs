//! Core data types: pricing and normalized model descriptions.

pub mod model;
pub mod pricing;

pub use model::{
    Benchmark, ModelDescription, ModelInterface, ParamId, ParameterSpec, visible_models,
};
pub use pricing::{CacheDialect, CachePricing, Price, PriceTier, PricingStructure};
