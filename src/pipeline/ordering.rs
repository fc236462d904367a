//! Deterministic ordering of resolved models.
//!
//! Primary key is the declaration index of the rule that claims the model
//! (unclaimed models last), secondary key is the display label compared the
//! way a UI collation would: symbols before digits before letters,
//! case-insensitive first, lowercase before uppercase on ties. The
//! identifier breaks any remaining tie, so two runs on the same input always
//! produce the same sequence.

use std::cmp::Ordering;

use crate::registry::CatalogRegistry;
use crate::types::ModelDescription;

/// Sort key of one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingKey<'a> {
    pub rank: Option<usize>,
    pub label: &'a str,
    pub id: &'a str,
}

impl<'a> OrderingKey<'a> {
    pub fn of(registry: &CatalogRegistry, model: &'a ModelDescription) -> Self {
        Self {
            rank: registry.rank(&model.id),
            label: &model.label,
            id: &model.id,
        }
    }
}

impl Ord for OrderingKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_rank(self.rank, other.rank)
            .then_with(|| compare_labels(self.label, other.label))
            .then_with(|| self.id.cmp(other.id))
    }
}

impl PartialOrd for OrderingKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_rank(a: Option<usize>, b: Option<usize>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// ASCII punctuation and symbols in root collation order.
const SYMBOL_ORDER: &[u8] = b"\t\n\r _-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Primary collation weight of one character: symbols, then digits, then
/// letters (case-folded), then everything else by code point.
fn primary_weight(c: char) -> (u8, u32) {
    if c.is_ascii()
        && let Some(pos) = SYMBOL_ORDER.iter().position(|&b| char::from(b) == c)
    {
        return (0, pos as u32);
    }
    if c.is_ascii_digit() {
        return (1, u32::from(c));
    }
    let folded = c.to_lowercase().next().unwrap_or(c);
    if folded.is_alphabetic() {
        return (2, u32::from(folded));
    }
    (3, u32::from(c))
}

/// Collation-style label comparison; `Equal` only for identical strings.
///
/// Primary weights first, then lowercase before uppercase at the first case
/// difference, then raw bytes.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(primary_weight)
        .cmp(b.chars().map(primary_weight))
        .then_with(|| case_tiebreak(a, b))
        .then_with(|| a.cmp(b))
}

fn case_tiebreak(a: &str, b: &str) -> Ordering {
    a.chars()
        .zip(b.chars())
        .find_map(|(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            _ => None,
        })
        .unwrap_or(Ordering::Equal)
}

/// Sort in place. The sort is stable, so exact duplicates keep input order.
pub fn sort_models(registry: &CatalogRegistry, models: &mut [ModelDescription]) {
    models.sort_by(|a, b| OrderingKey::of(registry, a).cmp(&OrderingKey::of(registry, b)));
}
