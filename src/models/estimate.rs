use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceEstimate: Suggested resale range for one gift
// ---------------------------------------------------------------------------

/// Price range in TON, rounded to cents, with `fast <= market <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEstimate {
    /// Price expected to sell quickly.
    pub fast: f64,
    /// Fair market price.
    pub market: f64,
    /// Upper end; may take a while to sell.
    pub max: f64,
    /// Applied rarity markup, in percent (0..=60 with default settings).
    pub bonus_percent: f64,
}

// ---------------------------------------------------------------------------
// Appraisal: Estimate together with the floor that produced it
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appraisal {
    pub collection: String,
    pub floor_ton: f64,
    pub source: String,
    pub cached: bool,
    pub estimate: PriceEstimate,
}
