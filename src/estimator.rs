//! Rarity-aware price estimation from a collection floor price.
//!
//! The estimator is a pure function of `(floor, attributes)`: every rare
//! attribute adds a markup on top of the floor, the markup is capped, and the
//! resulting fast/market/max triple is clipped to hard bounds derived from
//! the floor alone.

use crate::config::PricingConfig;
use crate::error::{GiftPriceError, Result};
use crate::models::{Attribute, PriceEstimate};

/// Markup fraction contributed by one attribute with the given rarity
/// fraction.
///
/// | rarity fraction  | bonus |
/// |------------------|-------|
/// | > 0.05           | 0.00  |
/// | (0.02, 0.05]     | 0.05  |
/// | (0.01, 0.02]     | 0.10  |
/// | (0.005, 0.01]    | 0.15  |
/// | <= 0.005         | 0.25  |
///
/// Values outside `[0, 1]` go through the same comparisons: anything above
/// `0.05` earns nothing and anything at or below `0.005` (including
/// negatives) earns the top bonus.
pub fn rarity_bonus(rarity_fraction: f64) -> f64 {
    if rarity_fraction > 0.05 {
        0.0
    } else if rarity_fraction > 0.02 {
        0.05
    } else if rarity_fraction > 0.01 {
        0.10
    } else if rarity_fraction > 0.005 {
        0.15
    } else {
        0.25
    }
}

/// Round half away from zero to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Estimate a price range with the default [`PricingConfig`].
///
/// Fails with [`GiftPriceError::InvalidFloorPrice`] when the floor is
/// missing, non-positive or not finite.
pub fn estimate_price(floor_price: Option<f64>, attributes: &[Attribute]) -> Result<PriceEstimate> {
    PriceEstimator::default().estimate(floor_price, attributes)
}

// ---------------------------------------------------------------------------
// PriceEstimator
// ---------------------------------------------------------------------------

/// Price estimator with configurable multipliers and bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceEstimator {
    config: PricingConfig,
}

impl PriceEstimator {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Summed rarity bonus over `attributes`, capped at the configured
    /// maximum. Attributes with a NaN rarity contribute nothing.
    pub fn total_bonus(&self, attributes: &[Attribute]) -> f64 {
        // `Iterator::sum` over f64 starts at -0.0.
        let sum = attributes
            .iter()
            .filter(|a| !a.rarity.is_nan())
            .map(|a| rarity_bonus(a.rarity_fraction()))
            .fold(0.0, |acc, bonus| acc + bonus);
        sum.min(self.config.bonus_cap)
    }

    /// Compute the fast/market/max triple for one gift.
    pub fn estimate(&self, floor_price: Option<f64>, attributes: &[Attribute]) -> Result<PriceEstimate> {
        let floor = validate_floor(floor_price)?;
        let cfg = &self.config;

        let total_bonus = self.total_bonus(attributes);
        let base = floor * (1.0 + total_bonus);

        let hard_min = floor * cfg.hard_min_factor;
        let hard_max = floor * cfg.hard_max_factor;

        let market = base;
        let mut fast = (base * cfg.fast_multiplier).max(hard_min);
        let mut max = (base * cfg.max_multiplier).min(hard_max);

        // Hard bounds may cross the market price under unusual configs.
        if fast > market {
            fast = market;
        }
        if max < market {
            max = market;
        }

        let estimate = PriceEstimate {
            fast: round_cents(fast),
            market: round_cents(market),
            max: round_cents(max),
            bonus_percent: round_cents(total_bonus * 100.0),
        };
        debug_assert!(estimate.fast <= estimate.market && estimate.market <= estimate.max);
        Ok(estimate)
    }
}

fn validate_floor(floor_price: Option<f64>) -> Result<f64> {
    match floor_price {
        None => Err(GiftPriceError::InvalidFloorPrice(
            "floor price is missing".to_string(),
        )),
        Some(f) if !f.is_finite() || f <= 0.0 => Err(GiftPriceError::InvalidFloorPrice(format!(
            "floor price must be positive, got {}",
            f
        ))),
        Some(f) => Ok(f),
    }
}
