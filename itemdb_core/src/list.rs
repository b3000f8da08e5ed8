//! Item lists: the master catalog and curated subsets.
//!
//! Curated lists come in three formats: a JSON list in master format, a
//! plain text file of item names (one per line), or a CSV with a name
//! column. Name-based formats are resolved against the master list; a name
//! matching several catalog entries keeps all of them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::text::fuzzy_eq;
use crate::types::SuffixType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemListEntry {
    pub id: u32,
    pub name: String,
}

pub type ItemList = Vec<ItemListEntry>;

/// Load a list already in `[{id, name}]` form.
pub fn load_json(path: &Path) -> Result<ItemList> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Load a curated text file of item names, one per line.
pub fn load_txt(path: &Path, master: &[ItemListEntry]) -> Result<ItemList> {
    let text = std::fs::read_to_string(path)?;
    Ok(from_names(text.lines(), master))
}

/// Load a curated CSV, taking names from `name_column`.
pub fn load_csv(path: &Path, master: &[ItemListEntry], name_column: &str) -> Result<ItemList> {
    let mut reader = csv::Reader::from_path(path)?;
    let column = reader
        .headers()?
        .iter()
        .position(|h| h == name_column)
        .ok_or_else(|| Error::UnknownItem {
            name: format!("csv column {name_column}"),
        })?;
    let mut names = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(name) = record.get(column) {
            names.push(name.to_owned());
        }
    }
    Ok(from_names(names.iter().map(String::as_str), master))
}

/// Resolve a set of item names against the master list. Names are reduced
/// to their base form first, duplicated input names collapse to one, and a
/// base name matching several catalog entries contributes all of them. A
/// name matching nothing is logged and dropped.
pub fn from_names<'a>(
    names: impl IntoIterator<Item = &'a str>,
    master: &[ItemListEntry],
) -> ItemList {
    let mut seen: Vec<String> = Vec::new();
    for raw in names {
        let name = base_name(raw);
        if name.is_empty() || seen.iter().any(|s| fuzzy_eq(s, &name)) {
            continue;
        }
        seen.push(name);
    }

    let mut list = ItemList::new();
    for name in &seen {
        let mut found = false;
        for entry in master {
            if fuzzy_eq(&entry.name, name) {
                list.push(entry.clone());
                found = true;
            }
        }
        if !found {
            warn!(%name, "item name not in master list");
        }
    }
    list
}

/// Drop a recognized trailing enchant phrase from a decorated item name, so
/// "Hanzo Sword of the Bear" resolves like "Hanzo Sword".
pub fn base_name(name: &str) -> String {
    let trimmed = name.trim();
    if let Some(suffix_type) = SuffixType::from_text(trimmed) {
        let lower = trimmed.to_lowercase();
        if let Some(at) = lower.rfind(&suffix_type.phrase().to_lowercase()) {
            return trimmed[..at].trim_end().to_owned();
        }
    }
    trimmed.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master() -> ItemList {
        vec![
            ItemListEntry {
                id: 1,
                name: "Hanzo Sword".into(),
            },
            ItemListEntry {
                id: 2,
                name: "Stonemason Cloak".into(),
            },
            // name collision in the catalog, both kept on a match
            ItemListEntry {
                id: 3,
                name: "Stonemason Cloak".into(),
            },
        ]
    }

    #[test]
    fn base_name_strips_enchant_phrase() {
        assert_eq!(base_name("Hanzo Sword of the Bear"), "Hanzo Sword");
        assert_eq!(base_name("  Hanzo Sword  "), "Hanzo Sword");
        assert_eq!(base_name("Bearclaw Gauntlets"), "Bearclaw Gauntlets");
    }

    #[test]
    fn names_resolve_with_duplicates_kept() {
        let list = from_names(
            ["Stonemason Cloak", "hanzo sword", "Stonemason Cloak", "No Such Item"],
            &master(),
        );
        let ids: Vec<u32> = list.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn decorated_names_resolve_to_base_items() {
        let list = from_names(["Hanzo Sword of the Monkey"], &master());
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, 1);
    }

    #[test]
    fn csv_lists_use_the_name_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bis.csv");
        std::fs::write(&path, "Slot,Name\nBack,Stonemason Cloak\nWeapon,Hanzo Sword\n").unwrap();
        let list = load_csv(&path, &master(), "Name").unwrap();
        let ids: Vec<u32> = list.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert!(load_csv(&path, &master(), "Item").is_err());
    }
}
