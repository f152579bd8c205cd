use crate::model::{Item, Price, PriceRecord, Store};
use std::collections::BTreeMap;

/// The offer chosen for one (item, store) cell of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub price: Price,
    pub product_name: String,
}

/// Item name -> store id -> chosen offer. A missing store key means the
/// store had no offer for that item; it is never represented as a zero
/// price. Row display order comes from the item list, not from map order.
pub type ComparisonGrid = BTreeMap<String, BTreeMap<String, Offer>>;

/// Store id -> sum of chosen prices over all grid rows with an offer there.
pub type StoreTotals = BTreeMap<String, Price>;

/// Everything the presentation layer needs for one comparison.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub grid: ComparisonGrid,
    pub totals: StoreTotals,
    pub cheapest: Option<String>,
}

/// Build the item x store grid from a snapshot of the list and the
/// records a price source returned for it.
///
/// Every item name gets a row, so items with no offers still show up as
/// empty rows. A record only lands if its item name exactly matches a
/// row (case-sensitive); fuzzy matching is the source's job. When several
/// records share an (item, store) pair, the last one in input order wins.
/// Malformed records are a contract violation and abort the build.
pub fn build_grid(items: &[Item], records: &[PriceRecord]) -> Result<ComparisonGrid, String> {
    let mut grid = ComparisonGrid::new();
    for item in items {
        grid.entry(item.name.clone()).or_default();
    }
    for record in records {
        record.validate()?;
        if let Some(row) = grid.get_mut(&record.item_name) {
            row.insert(
                record.store_id.clone(),
                Offer {
                    price: record.price,
                    product_name: record.product_name.clone(),
                },
            );
        }
    }
    Ok(grid)
}

/// Sum each store's chosen prices across the grid. Every store appears,
/// starting at zero; rows without an offer at a store contribute nothing.
pub fn compute_store_totals(grid: &ComparisonGrid, stores: &[Store]) -> StoreTotals {
    let mut totals: StoreTotals = stores
        .iter()
        .map(|s| (s.id.clone(), Price::ZERO))
        .collect();
    for row in grid.values() {
        for (store_id, offer) in row {
            if let Some(total) = totals.get_mut(store_id) {
                *total += offer.price;
            }
        }
    }
    totals
}

/// The store with the lowest total among stores that matched at least
/// one item. Candidacy is presence in some grid row, not a positive
/// total, so a store selling only free items can win and a store with no
/// data never wins on its empty zero. Ties go to the store listed first
/// in the canonical store order.
pub fn find_cheapest_store(
    totals: &StoreTotals,
    grid: &ComparisonGrid,
    stores: &[Store],
) -> Option<String> {
    let mut best: Option<(&str, Price)> = None;
    for store in stores {
        if !grid.values().any(|row| row.contains_key(&store.id)) {
            continue;
        }
        let total = totals.get(&store.id).copied().unwrap_or(Price::ZERO);
        match best {
            Some((_, best_total)) if total >= best_total => {}
            _ => best = Some((store.id.as_str(), total)),
        }
    }
    best.map(|(id, _)| id.to_string())
}

/// Lowest offered price in one item's row, for flagging the cheapest
/// cell. None when no store has an offer.
pub fn cheapest_offer_for_item(grid: &ComparisonGrid, item_name: &str) -> Option<Price> {
    grid.get(item_name)?
        .values()
        .map(|offer| offer.price)
        .min()
}

/// Grid, totals, and cheapest store in one pass. Pure and deterministic:
/// identical inputs always produce an identical comparison.
pub fn compare(
    items: &[Item],
    records: &[PriceRecord],
    stores: &[Store],
) -> Result<Comparison, String> {
    let grid = build_grid(items, records)?;
    let totals = compute_store_totals(&grid, stores);
    let cheapest = find_cheapest_store(&totals, &grid, stores);
    Ok(Comparison {
        grid,
        totals,
        cheapest,
    })
}
