//! Pricing types.
//!
//! Prices are expressed in USD per one million tokens. A price is either a
//! keyword (`"free"`), a flat number, or an ordered list of tiers selected by
//! prompt size:
//!
//! ```json
//! { "input": [{ "upTo": 200000, "price": 1.25 }, { "upTo": null, "price": 2.5 }],
//!   "output": 10.0,
//!   "cache": { "cType": "oai-ac", "read": 0.31 } }
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One tier of a tiered price. `up_to == None` is the unbounded tail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    pub up_to: Option<u64>,
    pub price: f64,
}

impl PriceTier {
    pub const fn new(up_to: Option<u64>, price: f64) -> Self {
        Self { up_to, price }
    }
}

/// A per-million-token price.
#[derive(Debug, Clone, PartialEq)]
pub enum Price {
    /// No charge (experimental models)
    Free,
    /// Same rate regardless of prompt size
    Flat(f64),
    /// Rate selected by prompt size; thresholds strictly increase and the last
    /// tier is unbounded
    Tiered(Vec<PriceTier>),
}

impl Price {
    pub const fn flat(price: f64) -> Self {
        Self::Flat(price)
    }

    /// Build a tiered price from `(up_to, price)` pairs.
    pub fn tiered<I>(tiers: I) -> Self
    where
        I: IntoIterator<Item = (Option<u64>, f64)>,
    {
        Self::Tiered(
            tiers
                .into_iter()
                .map(|(up_to, price)| PriceTier::new(up_to, price))
                .collect(),
        )
    }

    /// Per-million rate applied to a prompt of `prompt_tokens` tokens.
    pub fn rate_for(&self, prompt_tokens: u64) -> Option<f64> {
        match self {
            Self::Free => Some(0.0),
            Self::Flat(price) => Some(*price),
            Self::Tiered(tiers) => tiers
                .iter()
                .find(|tier| tier.up_to.is_none_or(|limit| prompt_tokens <= limit))
                .map(|tier| tier.price),
        }
    }

    /// Check the tier invariants; the error names the first violation.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Free => Ok(()),
            Self::Flat(price) => check_amount(*price),
            Self::Tiered(tiers) => {
                let Some((last, head)) = tiers.split_last() else {
                    return Err("tiered price has no tiers".to_string());
                };
                if last.up_to.is_some() {
                    return Err("last tier must be unbounded (upTo = null)".to_string());
                }
                let mut previous: Option<u64> = None;
                for tier in head {
                    let Some(limit) = tier.up_to else {
                        return Err("only the last tier may be unbounded".to_string());
                    };
                    if previous.is_some_and(|p| limit <= p) {
                        return Err(format!(
                            "tier thresholds must strictly increase (got {limit} after {})",
                            previous.unwrap_or_default()
                        ));
                    }
                    previous = Some(limit);
                    check_amount(tier.price)?;
                }
                check_amount(last.price)
            }
        }
    }
}

fn check_amount(price: f64) -> Result<(), String> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(format!("price must be a finite, non-negative number (got {price})"))
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Free => serializer.serialize_str("free"),
            Self::Flat(price) => serializer.serialize_f64(*price),
            Self::Tiered(tiers) => tiers.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Keyword(String),
            Flat(f64),
            Tiered(Vec<PriceTier>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Keyword(k) if k == "free" => Ok(Self::Free),
            Repr::Keyword(k) => Err(serde::de::Error::custom(format!(
                "unknown price keyword '{k}'"
            ))),
            Repr::Flat(price) => Ok(Self::Flat(price)),
            Repr::Tiered(tiers) => Ok(Self::Tiered(tiers)),
        }
    }
}

/// How a provider bills cached prompt tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheDialect {
    /// Automatic (implicit) prompt caching, read-only pricing
    #[serde(rename = "oai-ac")]
    AutoCache,
    /// Explicit cache breakpoints with separate write pricing
    #[serde(rename = "ant-bp")]
    Breakpoints,
}

/// Cached-input pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachePricing {
    #[serde(rename = "cType")]
    pub dialect: CacheDialect,
    pub read: Price,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub write: Option<Price>,
}

impl CachePricing {
    pub const fn auto_cache(read: Price) -> Self {
        Self {
            dialect: CacheDialect::AutoCache,
            read,
            write: None,
        }
    }
}

/// Pricing for chat usage of a model. Missing components are unpriced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PricingStructure {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub input: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub output: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cache: Option<CachePricing>,
}

impl PricingStructure {
    pub const fn new(input: Price, output: Price) -> Self {
        Self {
            input: Some(input),
            output: Some(output),
            cache: None,
        }
    }

    /// Input-only pricing (output not published yet)
    pub const fn input_only(input: Price) -> Self {
        Self {
            input: Some(input),
            output: None,
            cache: None,
        }
    }

    pub const fn free() -> Self {
        Self::new(Price::Free, Price::Free)
    }

    pub fn with_cache(mut self, cache: CachePricing) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        let parts = [
            ("input", self.input.as_ref()),
            ("output", self.output.as_ref()),
            ("cache.read", self.cache.as_ref().map(|c| &c.read)),
            ("cache.write", self.cache.as_ref().and_then(|c| c.write.as_ref())),
        ];
        for (name, price) in parts {
            if let Some(price) = price {
                price.validate().map_err(|e| format!("{name}: {e}"))?;
            }
        }
        Ok(())
    }

    /// Estimated USD cost of one request. The tier is chosen by prompt size for
    /// both directions; `None` when either side is unpriced.
    pub fn estimate_cost(&self, input_tokens: u64, output_tokens: u64) -> Option<f64> {
        let input_rate = self.input.as_ref()?.rate_for(input_tokens)?;
        let output_rate = self.output.as_ref()?.rate_for(input_tokens)?;
        Some(
            (input_tokens as f64 * input_rate + output_tokens as f64 * output_rate) / 1_000_000.0,
        )
    }
}
