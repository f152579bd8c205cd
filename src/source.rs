use crate::model::{Price, PriceRecord, Store};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Supplies price records for a list of item names.
///
/// "No data" is an empty Ok; failures travel on the Err channel and are
/// never encoded as fabricated zero-price records.
pub trait PriceSource {
    fn fetch_prices(&self, item_names: &[String]) -> Result<Vec<PriceRecord>, String>;
}

/// The fixed set of retailers we compare across.
pub fn default_stores() -> Vec<Store> {
    let store = |id: &str, name: &str| Store {
        id: id.to_string(),
        name: name.to_string(),
        logo: "/placeholder.svg".to_string(),
    };
    vec![
        store("walmart", "Walmart"),
        store("target", "Target"),
        store("kroger", "Kroger"),
    ]
}

/// One product listed in the catalog under a generic key. A listing with
/// a store id is carried by that store only; one without is available
/// everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub product_name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

/// A file-backed price source: generic product keys mapped to the
/// listings carried across the store set.
///
/// Lookup is deliberately loose here so the engine can stay exact: the
/// requested item name and the catalog key match case-insensitively if
/// either contains the other, and the emitted records carry the
/// requested name verbatim. Per store we emit at most one record, the
/// cheapest listing available there (first listed wins a price tie).
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: BTreeMap<String, Vec<Listing>>,
    stores: Vec<Store>,
}

impl Catalog {
    pub fn from_json(json: &str, stores: Vec<Store>) -> Result<Catalog, String> {
        let entries: BTreeMap<String, Vec<Listing>> =
            serde_json::from_str(json).map_err(|e| format!("invalid catalog JSON: {e}"))?;
        Ok(Catalog { entries, stores })
    }

    pub fn load(path: &std::path::Path, stores: Vec<Store>) -> Result<Catalog, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read catalog {}: {e}", path.display()))?;
        Catalog::from_json(&json, stores)
    }

    /// First catalog key matching the requested name, in key order.
    fn lookup(&self, item_name: &str) -> Option<&Vec<Listing>> {
        let wanted = item_name.to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| {
                let key = key.to_lowercase();
                wanted.contains(&key) || key.contains(&wanted)
            })
            .map(|(_, listings)| listings)
    }
}

impl PriceSource for Catalog {
    fn fetch_prices(&self, item_names: &[String]) -> Result<Vec<PriceRecord>, String> {
        let mut records = Vec::new();
        for name in item_names {
            let Some(listings) = self.lookup(name) else {
                continue;
            };
            for store in &self.stores {
                // Strict < keeps the first listing on a price tie
                // (min_by_key would keep the last).
                let mut best: Option<&Listing> = None;
                for listing in listings
                    .iter()
                    .filter(|l| l.store_id.as_deref().is_none_or(|id| id == store.id))
                {
                    match best {
                        Some(b) if listing.price >= b.price => {}
                        _ => best = Some(listing),
                    }
                }
                if let Some(listing) = best {
                    records.push(PriceRecord {
                        item_name: name.clone(),
                        store_id: store.id.clone(),
                        price: listing.price,
                        product_name: listing.product_name.clone(),
                    });
                }
            }
        }
        Ok(records)
    }
}

/// Starter catalog written by `cw init`, mirroring a typical week's
/// staples with fixed prices.
pub fn sample_catalog_json() -> String {
    let entry = |products: &[(&str, &str, Option<&str>)]| -> Vec<Listing> {
        products
            .iter()
            .map(|(name, price, store)| Listing {
                product_name: name.to_string(),
                price: price.parse().expect("sample price is well-formed"),
                store_id: store.map(str::to_string),
            })
            .collect()
    };
    let mut entries = BTreeMap::new();
    entries.insert(
        "organic apples".to_string(),
        entry(&[("Fresh Gala Apples", "2.99", None)]),
    );
    entries.insert(
        "whole milk (1 gallon)".to_string(),
        entry(&[
            ("Great Value Milk", "3.80", Some("walmart")),
            ("Horizon Organic Milk", "5.50", None),
        ]),
    );
    entries.insert(
        "sourdough bread".to_string(),
        entry(&[
            ("Bakery Fresh Sourdough", "4.20", None),
            ("Pepperidge Farm Sourdough", "4.80", None),
        ]),
    );
    entries.insert(
        "white bread".to_string(),
        entry(&[
            ("WonderBread", "2.80", None),
            ("Store Brand White Bread", "2.20", Some("target")),
        ]),
    );
    entries.insert(
        "eggs".to_string(),
        entry(&[
            ("Grade A Large Eggs", "3.10", None),
            ("Organic Free-Range Eggs", "5.20", None),
        ]),
    );
    serde_json::to_string_pretty(&entries).expect("sample catalog serializes")
}
