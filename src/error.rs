/// User-facing text shown when no usable floor price is available.
pub const MARKET_UNAVAILABLE_MESSAGE: &str =
    "Market data temporarily unavailable. Unable to determine collection floor.";

#[derive(Debug, thiserror::Error)]
pub enum GiftPriceError {
    #[error("Invalid floor price: {0}")]
    InvalidFloorPrice(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl GiftPriceError {
    /// Message suitable for showing to an end user.
    ///
    /// Floor failures collapse to a generic "market data unavailable" line so
    /// that presentation never depends on which upstream failed.
    pub fn user_message(&self) -> String {
        match self {
            GiftPriceError::InvalidFloorPrice(_) | GiftPriceError::NotFound(_) => {
                MARKET_UNAVAILABLE_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GiftPriceError>;
