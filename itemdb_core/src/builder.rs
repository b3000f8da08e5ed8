//! Batch orchestration: an item list in, four output views out.

use std::collections::HashSet;
use std::path::Path;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::enchant;
use crate::error::Result;
use crate::extract;
use crate::item::Item;
use crate::list::ItemListEntry;
use crate::resolve;
use crate::store::{self, DocumentStore};
use crate::suffix::{ItemSuffix, SuffixCatalog};
use crate::types::SuffixType;

/// Concurrency ceiling for per-item transforms, independent of list size.
pub const WORKERS: usize = 10;

/// The four views produced by one build.
#[derive(Debug, Default)]
pub struct Database {
    /// Equippable records: derived variants replace their base item; items
    /// without resolvable suffixes appear as themselves.
    pub full: Vec<Item>,
    /// Exactly one base record per input item, candidate ids attached.
    pub modular: Vec<Item>,
    /// Every derived variant across the whole list.
    pub random: Vec<Item>,
    /// Definitions referenced by any variant, deduplicated structurally.
    pub used_suffixes: Vec<ItemSuffix>,
}

struct ParsedItem {
    item: Item,
    variants: Vec<Item>,
    suffixes: Vec<ItemSuffix>,
}

/// Run the full pipeline over `list` with bounded parallelism. A failing
/// item is logged and skipped; the batch never aborts. Results keep list
/// order regardless of completion order.
pub fn build_database(
    list: &[ItemListEntry],
    catalog: &SuffixCatalog,
    store: &DocumentStore,
    accepted: Option<&[SuffixType]>,
) -> Result<Database> {
    info!(items = list.len(), "building database");
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(WORKERS)
        .build()?;
    let results: Vec<Option<ParsedItem>> = pool.install(|| {
        list.par_iter()
            .map(|entry| match parse_item(entry, catalog, store, accepted) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warn!(id = entry.id, name = %entry.name, %err, "skipping item");
                    None
                }
            })
            .collect()
    });

    let mut db = Database::default();
    let mut seen = HashSet::new();
    for parsed in results.into_iter().flatten() {
        for def in parsed.suffixes {
            if seen.insert(def.structural_key()) {
                db.used_suffixes.push(def);
            }
        }
        db.modular.push(parsed.item.clone());
        if parsed.variants.is_empty() {
            db.full.push(parsed.item);
        } else {
            db.full.extend(parsed.variants.iter().cloned());
            db.random.extend(parsed.variants);
        }
    }
    info!(
        full = db.full.len(),
        modular = db.modular.len(),
        random = db.random.len(),
        suffixes = db.used_suffixes.len(),
        "build complete"
    );
    Ok(db)
}

/// One item end to end: read documents, extract, resolve candidate
/// suffixes, derive variants, apply overrides.
fn parse_item(
    entry: &ItemListEntry,
    catalog: &SuffixCatalog,
    store: &DocumentStore,
    accepted: Option<&[SuffixType]>,
) -> Result<ParsedItem> {
    let xml = store.read_xml(entry.id, &entry.name)?;
    let html = store.read_html(entry.id, &entry.name)?;
    let extracted = extract::extract(entry.id, &xml, &html)?;

    let mut item = extracted.item;
    if let Some(section) = &extracted.random_enchants_html {
        let ids = resolve::resolve(catalog, section, accepted);
        if !ids.is_empty() {
            item.valid_suffix_ids = Some(ids);
        }
    }

    let mut variants = Vec::new();
    let mut suffixes = Vec::new();
    if let Some(ids) = &item.valid_suffix_ids {
        for &id in ids {
            if let Some(def) = catalog.find_by_id(id) {
                variants.push(enchant::derive(&item, def));
                suffixes.push(def.clone());
            }
        }
    }

    // Overrides patch the base record only; variants derive from the
    // as-scraped item.
    if let Some(patch) = store.load_override(entry.id)? {
        item = item.merge_override(&patch)?;
    }

    Ok(ParsedItem {
        item,
        variants,
        suffixes,
    })
}

/// Serialize all four views into `dir`.
pub fn write_database(db: &Database, dir: &Path) -> Result<()> {
    store::write_json(&dir.join("item.json"), &db.full)?;
    store::write_json(&dir.join("item-modular.json"), &db.modular)?;
    store::write_json(&dir.join("item-random.json"), &db.random)?;
    store::write_json(&dir.join("itemSuffix.json"), &db.used_suffixes)?;
    info!(dir = %dir.display(), "wrote database files");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suffix::Bonus;
    use crate::types::BonusType;

    fn catalog() -> SuffixCatalog {
        let stamina = |id, value| ItemSuffix {
            id,
            suffix_type: SuffixType::Stamina,
            bonus: vec![Bonus {
                bonus_type: BonusType::Stamina,
                value,
            }],
        };
        SuffixCatalog::new(vec![stamina(9, 6), stamina(10, 7)]).unwrap()
    }

    fn plain_xml(name: &str) -> String {
        format!(
            r#"<item><name><![CDATA[{name}]]></name><inventorySlot id="9"/>
            <jsonEquip><![CDATA["sta":3]]></jsonEquip>
            <htmlTooltip><![CDATA[<table/>]]></htmlTooltip></item>"#
        )
    }

    fn enchanted_xml(name: &str) -> String {
        format!(
            r#"<item><name><![CDATA[{name}]]></name><inventorySlot id="9"/>
            <jsonEquip><![CDATA["armor":32]]></jsonEquip>
            <htmlTooltip><![CDATA[<span>Random enchant</span>]]></htmlTooltip></item>"#
        )
    }

    const ENCHANT_HTML: &str = r#"<div class="random-enchantments"><ul>
        <li><div><span>of Stamina</span>+(6 - 7) Stamina<small>(50% chance)</small></div></li>
        </ul></div>"#;

    fn store_with_fixtures(dir: &Path) -> DocumentStore {
        let store = DocumentStore::new(dir);
        store.write_xml(100, "Plain Hat", &plain_xml("Plain Hat")).unwrap();
        store.write_html(100, "Plain Hat", "").unwrap();
        store
            .write_xml(200, "Glimmer Bracers", &enchanted_xml("Glimmer Bracers"))
            .unwrap();
        store.write_html(200, "Glimmer Bracers", ENCHANT_HTML).unwrap();
        store
    }

    fn list() -> Vec<ItemListEntry> {
        vec![
            ItemListEntry {
                id: 100,
                name: "Plain Hat".into(),
            },
            ItemListEntry {
                id: 200,
                name: "Glimmer Bracers".into(),
            },
            // no cached documents, skipped without failing the batch
            ItemListEntry {
                id: 300,
                name: "Ghost Item".into(),
            },
        ]
    }

    #[test]
    fn partitions_follow_the_view_rules() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_fixtures(dir.path());
        let db = build_database(&list(), &catalog(), &store, None).unwrap();

        // modular: one base record per surviving item, in list order
        let modular_ids: Vec<u32> = db.modular.iter().map(|i| i.id).collect();
        assert_eq!(modular_ids, vec![100, 200]);
        assert_eq!(db.modular[1].valid_suffix_ids, Some(vec![9, 10]));
        assert_eq!(db.modular[1].suffix_id, None);

        // full: plain item as itself, enchanted item only as variants
        assert_eq!(db.full.len(), 3);
        assert_eq!(db.full[0].name, "Plain Hat");
        assert_eq!(db.full[1].name, "Glimmer Bracers of Stamina");
        assert_eq!(db.full[1].suffix_id, Some(9));
        assert_eq!(db.full[1].stamina, Some(6));
        assert_eq!(db.full[2].suffix_id, Some(10));
        assert_eq!(db.full[2].stamina, Some(7));
        assert!(db.full.iter().all(|i| i.valid_suffix_ids.is_none()));

        // random: every variant
        assert_eq!(db.random.len(), 2);

        // used suffixes: both definitions, once each
        let ids: Vec<u32> = db.used_suffixes.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![9, 10]);
    }

    #[test]
    fn accepted_filter_empties_the_candidate_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_fixtures(dir.path());
        let db = build_database(
            &list(),
            &catalog(),
            &store,
            Some(&[SuffixType::ArcaneWrath]),
        )
        .unwrap();
        assert_eq!(db.full.len(), 2);
        assert!(db.random.is_empty());
        assert!(db.used_suffixes.is_empty());
        assert_eq!(db.modular[1].valid_suffix_ids, None);
    }

    #[test]
    fn overrides_patch_the_base_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("cache"))
            .with_overrides(dir.path().join("overrides"));
        store.write_xml(100, "Plain Hat", &plain_xml("Plain Hat")).unwrap();
        store.write_html(100, "Plain Hat", "").unwrap();
        std::fs::create_dir_all(dir.path().join("overrides")).unwrap();
        std::fs::write(
            dir.path().join("overrides/100.json"),
            r#"{ "boss": "Prince Thunderaan" }"#,
        )
        .unwrap();

        let list = vec![ItemListEntry {
            id: 100,
            name: "Plain Hat".into(),
        }];
        let db = build_database(&list, &catalog(), &store, None).unwrap();
        assert_eq!(db.modular[0].boss.as_deref(), Some("Prince Thunderaan"));
    }

    #[test]
    fn write_database_emits_all_views() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_fixtures(&dir.path().join("cache"));
        let db = build_database(&list(), &catalog(), &store, None).unwrap();
        let out = dir.path().join("dist/full");
        write_database(&db, &out).unwrap();
        for file in ["item.json", "item-modular.json", "item-random.json", "itemSuffix.json"] {
            assert!(out.join(file).exists(), "{file} missing");
        }
        let text = std::fs::read_to_string(out.join("item.json")).unwrap();
        let parsed: Vec<Item> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), db.full.len());
        assert!(!text.contains("\"stamina\":0"));
    }
}
