//! Fixed floor table, for offline use and as a last-resort fallback.

use std::collections::HashMap;

use async_trait::async_trait;

use super::extract::floor_from_listings;
use super::{FloorProvider, ProviderResult};
use crate::models::Listing;

/// Serves floors from an in-memory table using the same matching rules as
/// the marketplace providers (case-insensitive containment, minimum wins).
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    name: String,
    listings: Vec<Listing>,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            listings: Vec::new(),
        }
    }

    pub fn with_floor(mut self, collection: impl Into<String>, price: f64) -> Self {
        self.listings.push(Listing {
            name: collection.into(),
            price,
        });
        self
    }

    pub fn from_map(name: impl Into<String>, floors: HashMap<String, f64>) -> Self {
        let mut listings: Vec<Listing> = floors
            .into_iter()
            .map(|(name, price)| Listing { name, price })
            .collect();
        listings.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            name: name.into(),
            listings,
        }
    }
}

#[async_trait]
impl FloorProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve_floor(&self, collection: &str) -> ProviderResult {
        Ok(floor_from_listings(&self.listings, collection))
    }
}
