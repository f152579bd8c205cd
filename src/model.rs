use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// A non-negative money amount in whole cents.
///
/// Prices come in as decimal strings ("3.10", "$3.10") and sum exactly;
/// two decimal places is the precision of every price in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn cents(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl std::str::FromStr for Price {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let raw = raw.strip_prefix('$').unwrap_or(raw);
        if raw.is_empty() {
            return Err("empty price".to_string());
        }
        if raw.starts_with('-') {
            return Err(format!("price cannot be negative: {s}"));
        }
        let (whole, frac) = match raw.split_once('.') {
            Some((w, f)) => (w, f),
            None => (raw, ""),
        };
        let dollars: u64 = whole
            .parse()
            .map_err(|_| format!("invalid price: {s}"))?;
        let cents: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| format!("invalid price: {s}"))? * 10,
            2 => frac.parse().map_err(|_| format!("invalid price: {s}"))?,
            _ => return Err(format!("price has more than two decimal places: {s}")),
        };
        dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .map(Price)
            .ok_or_else(|| format!("price out of range: {s}"))
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Add for Price {
    type Output = Price;
    fn add(self, rhs: Price) -> Price {
        Price(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Price) {
        self.0 += rhs.0;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Add::add)
    }
}

/// One entry on the user's grocery list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub added_at: DateTime<Utc>,
}

/// A retailer we compare prices across. Fixed reference data, never
/// mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub logo: String,
}

/// One observed price for one item at one store, as reported by a
/// price source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub item_name: String,
    pub store_id: String,
    pub price: Price,
    pub product_name: String,
}

impl PriceRecord {
    /// Reject records that would silently corrupt an aggregation.
    /// A negative price is unrepresentable by construction.
    pub fn validate(&self) -> Result<(), String> {
        if self.item_name.trim().is_empty() {
            return Err("price record has empty item name".to_string());
        }
        if self.store_id.trim().is_empty() {
            return Err(format!(
                "price record for '{}' has empty store id",
                self.item_name
            ));
        }
        if self.product_name.trim().is_empty() {
            return Err(format!(
                "price record for '{}' has empty product name",
                self.item_name
            ));
        }
        Ok(())
    }
}

/// The persisted grocery list. Insertion order is display order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GroceryList {
    pub items: Vec<Item>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        s.parse().unwrap()
    }

    // --- Price parsing ---

    #[test]
    fn price_parses_common_forms() {
        assert_eq!(price("3.10").cents(), 310);
        assert_eq!(price("3.1").cents(), 310);
        assert_eq!(price("3").cents(), 300);
        assert_eq!(price("0.05").cents(), 5);
        assert_eq!(price("$4.20").cents(), 420);
        assert_eq!(price(" 2.99 ").cents(), 299);
        assert_eq!(price("0").cents(), 0);
    }

    #[test]
    fn price_rejects_negative() {
        let err = "-1.50".parse::<Price>().unwrap_err();
        assert!(err.contains("negative"), "{err}");
        assert!("$-1".parse::<Price>().is_err());
    }

    #[test]
    fn price_rejects_malformed() {
        assert!("".parse::<Price>().is_err());
        assert!("$".parse::<Price>().is_err());
        assert!("abc".parse::<Price>().is_err());
        assert!("1.999".parse::<Price>().is_err());
        assert!("1.2.3".parse::<Price>().is_err());
        assert!("1,50".parse::<Price>().is_err());
    }

    #[test]
    fn price_display_two_decimals() {
        assert_eq!(price("3.1").to_string(), "3.10");
        assert_eq!(price("3").to_string(), "3.00");
        assert_eq!(price("0.05").to_string(), "0.05");
    }

    #[test]
    fn price_sums_exactly() {
        // 0.10 + 0.20 is the classic float trap; cents stay exact.
        let total: Price = [price("0.10"), price("0.20")].into_iter().sum();
        assert_eq!(total, price("0.30"));

        let mut t = Price::ZERO;
        t += price("3.80");
        t += price("2.20");
        assert_eq!(t.to_string(), "6.00");
    }

    #[test]
    fn price_ordering() {
        assert!(price("1.50") < price("2.00"));
        assert!(price("2.00") < price("2.01"));
        assert_eq!(price("2.00"), price("2"));
    }

    #[test]
    fn price_serde_round_trip() {
        let json = serde_json::to_string(&price("3.10")).unwrap();
        assert_eq!(json, r#""3.10""#);
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price("3.10"));
    }

    #[test]
    fn price_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>(r#""-2.00""#).is_err());
    }

    // --- Record validation ---

    fn record(item: &str, store: &str, product: &str) -> PriceRecord {
        PriceRecord {
            item_name: item.to_string(),
            store_id: store.to_string(),
            price: price("1.00"),
            product_name: product.to_string(),
        }
    }

    #[test]
    fn validate_accepts_well_formed() {
        assert!(
            record("eggs", "kroger", "Grade A Large Eggs")
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn validate_rejects_empty_fields() {
        assert!(record("", "kroger", "Eggs").validate().is_err());
        assert!(record("  ", "kroger", "Eggs").validate().is_err());
        assert!(record("eggs", "", "Eggs").validate().is_err());
        assert!(record("eggs", "kroger", " ").validate().is_err());
    }

    // --- List serde ---

    #[test]
    fn grocery_list_round_trip() {
        let list = GroceryList {
            items: vec![Item {
                id: 1,
                name: "Sourdough Bread".to_string(),
                added_at: Utc::now(),
            }],
        };
        let json = serde_json::to_string(&list).unwrap();
        let back: GroceryList = serde_json::from_str(&json).unwrap();
        assert_eq!(back.items.len(), 1);
        assert_eq!(back.items[0].id, 1);
        assert_eq!(back.items[0].name, "Sourdough Bread");
    }
}
