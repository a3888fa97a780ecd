use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Attribute: One rarity trait of a gift (model, symbol, backdrop, ...)
// ---------------------------------------------------------------------------

/// A single gift attribute and the share of the collection that carries it.
///
/// `rarity` may be given either as a fraction (`0.02`) or as a percentage
/// (`2.0`); the estimator treats anything above `1` as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,
    pub rarity: f64,
}

impl Attribute {
    pub fn new(name: impl Into<String>, rarity: f64) -> Self {
        Self {
            name: name.into(),
            rarity,
        }
    }

    /// Rarity as a fraction in `[0, 1]` for well-formed input.
    pub fn rarity_fraction(&self) -> f64 {
        if self.rarity > 1.0 {
            self.rarity / 100.0
        } else {
            self.rarity
        }
    }
}
