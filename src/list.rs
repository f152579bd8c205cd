use crate::model::{GroceryList, Item};
use crate::source;
use chrono::Utc;
use std::path::PathBuf;

const DIR: &str = ".cartwise";
const LIST_FILENAME: &str = "list.json";
const CATALOG_FILENAME: &str = "catalog.json";

pub fn from_json(json: &str) -> Result<GroceryList, String> {
    serde_json::from_str(json).map_err(|e| format!("invalid list JSON: {e}"))
}

pub fn to_json(list: &GroceryList) -> Result<String, String> {
    serde_json::to_string_pretty(list).map_err(|e| format!("failed to serialize list: {e}"))
}

/// Add an item, trimming the name and assigning the next id. Each call
/// produces a fresh snapshot for the engine to recompute from.
pub fn add_item(list: &mut GroceryList, name: &str) -> Result<u64, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("item name cannot be empty".to_string());
    }
    let id = list.items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
    list.items.push(Item {
        id,
        name: name.to_string(),
        added_at: Utc::now(),
    });
    Ok(id)
}

/// Resolve "3", "Eggs", or a unique name prefix like "egg" to an item.
pub fn resolve_item<'a>(list: &'a GroceryList, target: &str) -> Result<&'a Item, String> {
    if let Ok(id) = target.parse::<u64>() {
        if let Some(item) = list.items.iter().find(|i| i.id == id) {
            return Ok(item);
        }
    }
    if let Some(item) = list.items.iter().find(|i| i.name == target) {
        return Ok(item);
    }
    let wanted = target.to_lowercase();
    let matches: Vec<&Item> = list
        .items
        .iter()
        .filter(|i| i.name.to_lowercase().starts_with(&wanted))
        .collect();
    match matches.len() {
        0 => Err(format!("no item matching '{target}'")),
        1 => Ok(matches[0]),
        n => Err(format!(
            "ambiguous name '{target}' matches {n} items: {}",
            matches
                .iter()
                .map(|i| i.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

pub fn remove_item(list: &mut GroceryList, target: &str) -> Result<Item, String> {
    let id = resolve_item(list, target)?.id;
    let pos = list
        .items
        .iter()
        .position(|i| i.id == id)
        .ok_or_else(|| format!("no item matching '{target}'"))?;
    Ok(list.items.remove(pos))
}

pub fn item_names(list: &GroceryList) -> Vec<String> {
    list.items.iter().map(|i| i.name.clone()).collect()
}

fn dir() -> PathBuf {
    PathBuf::from(DIR)
}

fn list_path() -> PathBuf {
    dir().join(LIST_FILENAME)
}

pub fn catalog_path() -> PathBuf {
    dir().join(CATALOG_FILENAME)
}

/// Create .cartwise/ with an empty list and the starter catalog.
pub fn init() -> Result<(), String> {
    if dir().exists() {
        return Err("cartwise already initialized".to_string());
    }
    std::fs::create_dir(dir()).map_err(|e| format!("failed to create {DIR}/: {e}"))?;
    save(&GroceryList::default())?;
    std::fs::write(catalog_path(), source::sample_catalog_json())
        .map_err(|e| format!("failed to write sample catalog: {e}"))?;
    Ok(())
}

pub fn load() -> Result<GroceryList, String> {
    let json = std::fs::read_to_string(list_path())
        .map_err(|_| "no grocery list here (run 'cw init' first)".to_string())?;
    from_json(&json)
}

pub fn save(list: &GroceryList) -> Result<(), String> {
    let json = to_json(list)?;
    std::fs::write(list_path(), json).map_err(|e| format!("failed to write list: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_list(names: &[&str]) -> GroceryList {
        let mut list = GroceryList::default();
        for name in names {
            add_item(&mut list, name).unwrap();
        }
        list
    }

    // --- add_item ---

    #[test]
    fn add_assigns_monotonic_ids() {
        let list = make_list(&["Eggs", "Milk", "Bread"]);
        let ids: Vec<u64> = list.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn add_trims_name() {
        let mut list = GroceryList::default();
        add_item(&mut list, "  Eggs  ").unwrap();
        assert_eq!(list.items[0].name, "Eggs");
    }

    #[test]
    fn add_rejects_empty_name() {
        let mut list = GroceryList::default();
        assert!(add_item(&mut list, "").is_err());
        assert!(add_item(&mut list, "   ").is_err());
    }

    #[test]
    fn add_permits_duplicate_names() {
        let list = make_list(&["Eggs", "Eggs"]);
        assert_eq!(list.items.len(), 2);
        assert_ne!(list.items[0].id, list.items[1].id);
    }

    #[test]
    fn add_preserves_insertion_order() {
        let list = make_list(&["Zucchini", "Apples", "Milk"]);
        let names: Vec<&str> = list.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Zucchini", "Apples", "Milk"]);
    }

    #[test]
    fn ids_stay_unique_after_removal() {
        let mut list = make_list(&["Eggs", "Milk"]);
        remove_item(&mut list, "1").unwrap();
        let id = add_item(&mut list, "Bread").unwrap();
        assert_ne!(id, list.items[0].id);
    }

    // --- resolve_item ---

    #[test]
    fn resolve_by_id() {
        let list = make_list(&["Eggs", "Milk"]);
        assert_eq!(resolve_item(&list, "2").unwrap().name, "Milk");
    }

    #[test]
    fn resolve_by_exact_name() {
        let list = make_list(&["Eggs", "Milk"]);
        assert_eq!(resolve_item(&list, "Eggs").unwrap().id, 1);
    }

    #[test]
    fn resolve_by_unique_prefix() {
        let list = make_list(&["Eggs", "Milk"]);
        assert_eq!(resolve_item(&list, "mi").unwrap().name, "Milk");
    }

    #[test]
    fn resolve_ambiguous_prefix() {
        let list = make_list(&["Milk", "Mints"]);
        let err = resolve_item(&list, "mi").unwrap_err();
        assert!(err.contains("ambiguous"), "{err}");
    }

    #[test]
    fn resolve_no_match() {
        let list = make_list(&["Eggs"]);
        let err = resolve_item(&list, "Tofu").unwrap_err();
        assert!(err.contains("no item"), "{err}");
    }

    #[test]
    fn resolve_exact_name_beats_prefix_ambiguity() {
        let list = make_list(&["Milk", "Milk Chocolate"]);
        assert_eq!(resolve_item(&list, "Milk").unwrap().id, 1);
    }

    // --- remove_item ---

    #[test]
    fn remove_by_id() {
        let mut list = make_list(&["Eggs", "Milk"]);
        let removed = remove_item(&mut list, "1").unwrap();
        assert_eq!(removed.name, "Eggs");
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].name, "Milk");
    }

    #[test]
    fn remove_by_name() {
        let mut list = make_list(&["Eggs", "Milk"]);
        remove_item(&mut list, "Milk").unwrap();
        assert_eq!(list.items.len(), 1);
    }

    #[test]
    fn remove_nonexistent() {
        let mut list = make_list(&["Eggs"]);
        assert!(remove_item(&mut list, "Tofu").is_err());
        assert_eq!(list.items.len(), 1);
    }

    // --- JSON ---

    #[test]
    fn json_round_trip() {
        let list = make_list(&["Eggs", "Milk"]);
        let json = to_json(&list).unwrap();
        let back = from_json(&json).unwrap();
        assert_eq!(back.items.len(), 2);
        assert_eq!(back.items[1].name, "Milk");
    }

    #[test]
    fn from_json_invalid() {
        assert!(from_json("not json").is_err());
    }
}
