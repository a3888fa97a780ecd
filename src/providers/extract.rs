//! Listing extraction shared by the marketplace providers.
//!
//! Marketplace responses are loosely structured: listings may sit under
//! `docs`, `items` or be a bare array, names and prices use several field
//! names, and prices are sometimes nano-TON integers. These helpers turn such
//! a payload into a floor price.

use serde_json::Value;

use crate::config::{NANO_PER_TON, NANO_THRESHOLD};
use crate::models::Listing;

const NAME_FIELDS: &[&str] = &["name", "giftName", "title", "collection", "gift"];
const PRICE_FIELDS: &[&str] = &["price", "priceTon", "ton", "amount", "cost"];

/// Convert a raw upstream price to TON.
///
/// Anything above one million is taken to be nano-TON. This is a magnitude
/// guess: a genuine TON price above 1,000,000 would be misread, and a
/// nano-TON price below it (under 0.001 TON) would pass through unchanged.
pub fn normalize_price(raw: f64) -> f64 {
    if raw > NANO_THRESHOLD {
        raw / NANO_PER_TON
    } else {
        raw
    }
}

/// Extract the listing array from a marketplace response body.
pub fn listing_items(body: &Value) -> &[Value] {
    for key in ["docs", "items"] {
        if let Some(items) = body.get(key).and_then(|v| v.as_array()) {
            return items;
        }
    }
    body.as_array().map(|a| a.as_slice()).unwrap_or(&[])
}

fn first_name(item: &Value) -> String {
    NAME_FIELDS
        .iter()
        .filter_map(|key| item.get(*key).and_then(|v| v.as_str()))
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_string()
}

fn first_price(item: &Value) -> f64 {
    PRICE_FIELDS
        .iter()
        .filter_map(|key| item.get(*key))
        .filter_map(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .find(|p| *p != 0.0 && p.is_finite())
        .unwrap_or(0.0)
}

/// Normalise every listing in `body` (names as given, prices in TON).
pub fn listings_from_value(body: &Value) -> Vec<Listing> {
    listing_items(body)
        .iter()
        .map(|item| Listing {
            name: first_name(item),
            price: normalize_price(first_price(item)),
        })
        .collect()
}

/// Minimum positive price among listings whose name contains `collection`,
/// compared case-insensitively.
pub fn floor_from_listings(listings: &[Listing], collection: &str) -> Option<f64> {
    let needle = collection.to_lowercase();
    listings
        .iter()
        .filter(|l| l.name.to_lowercase().contains(&needle))
        .map(|l| l.price)
        .filter(|p| p.is_finite() && *p > 0.0)
        .fold(None, |min: Option<f64>, p| match min {
            Some(m) if m <= p => Some(m),
            _ => Some(p),
        })
}
