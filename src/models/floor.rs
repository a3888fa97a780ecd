use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FloorQuote: A resolved floor price and where it came from
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorQuote {
    pub collection: String,
    pub floor_ton: f64,
    /// Name of the provider that produced the floor.
    pub source: String,
    /// Served from the local cache rather than a live provider call.
    pub cached: bool,
}

// ---------------------------------------------------------------------------
// FloorResponse: JSON body served by the floor-proxy edge
// ---------------------------------------------------------------------------

/// Wire format of `GET /floor?collection=<name>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorResponse {
    pub ok: bool,
    #[serde(default)]
    pub collection: String,
    #[serde(default)]
    pub floor_ton: Option<f64>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl FloorResponse {
    pub fn found(collection: &str, floor_ton: Option<f64>, source: &str) -> Self {
        Self {
            ok: true,
            collection: collection.to_string(),
            floor_ton,
            source: source.to_string(),
            cached: false,
            error: None,
        }
    }

    pub fn failed(collection: &str, source: &str, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            collection: collection.to_string(),
            floor_ton: None,
            source: source.to_string(),
            cached: false,
            error: Some(error.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Listing: One marketplace listing after field normalisation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub name: String,
    /// Price in TON (nano-TON already converted).
    pub price: f64,
}
