//! The `build` command: run the batch pipeline for one or all configured
//! database variants.

use std::time::Instant;

use anyhow::{bail, Context, Result};
use tracing::info;

use itemdb_core::builder;
use itemdb_core::config::{BuildConfig, DbVariant};
use itemdb_core::list::{self, ItemList};
use itemdb_core::{DocumentStore, SuffixCatalog};

pub fn run(config: &BuildConfig, name: Option<&str>, all: bool) -> Result<()> {
    let catalog = SuffixCatalog::load(&config.suffix_catalog).with_context(|| {
        format!("loading suffix catalog {}", config.suffix_catalog.display())
    })?;
    let store = DocumentStore::new(&config.cache_dir).with_overrides(&config.overrides_dir);
    let master = list::load_json(&config.master_list).with_context(|| {
        format!(
            "loading master list {} (run `itemdb download` first)",
            config.master_list.display()
        )
    })?;

    if all {
        for variant in &config.databases {
            build_variant(config, variant, &catalog, &store, &master)?;
        }
        return Ok(());
    }
    let name = name.context("database name required unless --all is given")?;
    let variant = config
        .variant(name)
        .with_context(|| format!("no database {name:?} configured"))?;
    build_variant(config, variant, &catalog, &store, &master)
}

fn build_variant(
    config: &BuildConfig,
    variant: &DbVariant,
    catalog: &SuffixCatalog,
    store: &DocumentStore,
    master: &ItemList,
) -> Result<()> {
    let start = Instant::now();
    let items = variant_list(variant, master)?;
    let db = builder::build_database(&items, catalog, store, variant.suffix_types.as_deref())?;
    let out = config.output_dir.join(&variant.name);
    builder::write_database(&db, &out)?;
    info!(db = %variant.name, elapsed = ?start.elapsed(), "database built");
    Ok(())
}

/// The item list for a variant: its curated file when configured (format by
/// extension), the master list otherwise.
fn variant_list(variant: &DbVariant, master: &ItemList) -> Result<ItemList> {
    let Some(path) = &variant.item_list else {
        return Ok(master.clone());
    };
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let items = match ext {
        "json" => list::load_json(path)?,
        "txt" => list::load_txt(path, master)?,
        "csv" => list::load_csv(path, master, "Name")?,
        other => bail!(
            "unsupported item list format {other:?} for {}",
            path.display()
        ),
    };
    if items.is_empty() {
        bail!("item list {} resolved to no items", path.display());
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemdb_core::list::ItemListEntry;

    fn master() -> ItemList {
        vec![ItemListEntry {
            id: 1,
            name: "Hanzo Sword".into(),
        }]
    }

    #[test]
    fn no_curated_list_means_the_master_list() {
        let variant = DbVariant {
            name: "full".into(),
            item_list: None,
            suffix_types: None,
        };
        assert_eq!(variant_list(&variant, &master()).unwrap(), master());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let variant = DbVariant {
            name: "odd".into(),
            item_list: Some("custom/odd.yaml".into()),
            suffix_types: None,
        };
        assert!(variant_list(&variant, &master()).is_err());
    }

    #[test]
    fn txt_lists_resolve_against_the_master() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feral.txt");
        std::fs::write(&path, "Hanzo Sword\nNo Such Item\n").unwrap();
        let variant = DbVariant {
            name: "feral".into(),
            item_list: Some(path),
            suffix_types: None,
        };
        let items = variant_list(&variant, &master()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 1);
    }
}
