//! The `download` command: scrape the master item list and cache every
//! item's document pair (plus its icon). Everything is skip-if-cached, so an
//! interrupted run resumes where it left off.

use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info, warn};

use itemdb_core::list::{ItemList, ItemListEntry};
use itemdb_core::{markup, BuildConfig, DocumentStore};

const SITE: &str = "https://classic.wowhead.com";
const ICON_SITE: &str = "https://wow.zamimg.com/images/wow/icons/large";

// The item listing shows at most ~500 rows per page; ids run to ~24500.
const PAGE_STEP: u32 = 500;
const MAX_ID: u32 = 24500;
const RETRIES: u32 = 3;

pub fn run(config: &BuildConfig) -> Result<()> {
    let store = DocumentStore::new(&config.cache_dir);
    let master = master_list(config)?;
    info!(items = master.len(), "downloading item documents");
    for entry in &master {
        download_item(&store, config, entry)
            .with_context(|| format!("item {} ({})", entry.id, entry.name))?;
    }
    Ok(())
}

/// The cached master list, scraping it first if absent.
fn master_list(config: &BuildConfig) -> Result<ItemList> {
    if config.master_list.exists() {
        return Ok(itemdb_core::list::load_json(&config.master_list)?);
    }
    let list = scrape_master_list()?;
    if let Some(parent) = config.master_list.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&config.master_list, serde_json::to_string(&list)?)?;
    Ok(list)
}

fn scrape_master_list() -> Result<ItemList> {
    let mut items = ItemList::new();
    for start in (0..MAX_ID).step_by(PAGE_STEP as usize) {
        let url = format!(
            "{SITE}/items?filter=162:151:151;2:2:5;0:{start}:{}",
            start + PAGE_STEP
        );
        info!(start, max = MAX_ID, "scraping master list page");
        let body = fetch_text(&url)?;
        items.extend(parse_list_page(&body)?);
    }
    Ok(items)
}

/// The listing page renders its table from a script-embedded object literal
/// keyed by item id. Non-equippable entries (no slot code) are dropped here
/// so the rest of the pipeline never sees them.
fn parse_list_page(html: &str) -> Result<Vec<ItemListEntry>> {
    let script = markup::first_block(html, "script").context("no script block in list page")?;
    let data_line = script
        .lines()
        .nth(1)
        .context("unexpected list page script shape")?;
    let object_span = Regex::new(r"\{.*\}").context("table payload regex")?;
    let payload = object_span
        .find(data_line)
        .context("no table payload in list page script")?
        .as_str();
    let table: serde_json::Map<String, serde_json::Value> = serde_json::from_str(payload)?;

    let mut entries = Vec::new();
    for (key, row) in table {
        let Some(name) = row["name_enus"].as_str() else {
            continue;
        };
        if row["jsonequip"]["slotbak"].as_i64().unwrap_or(0) == 0 {
            debug!(name, "skipping, not equippable");
            continue;
        }
        entries.push(ItemListEntry {
            id: key.parse().with_context(|| format!("bad item id {key:?}"))?,
            name: name.to_owned(),
        });
    }
    Ok(entries)
}

/// Fetch the XML and HTML halves of one item's document pair, then its icon
/// (the icon name only exists inside the XML). Each piece is skipped when
/// already cached.
fn download_item(store: &DocumentStore, config: &BuildConfig, entry: &ItemListEntry) -> Result<()> {
    if !store.xml_path(entry.id, &entry.name).exists() {
        let xml = fetch_text(&format!("{SITE}/item={}&xml", entry.id))?;
        store.write_xml(entry.id, &entry.name, &xml)?;
    }
    if !store.html_path(entry.id, &entry.name).exists() {
        let html = fetch_text(&format!("{SITE}/item={}", entry.id))?;
        store.write_html(entry.id, &entry.name, &html)?;
    }

    let xml = store.read_xml(entry.id, &entry.name)?;
    if let Some(icon) = markup::tag_text(&xml, "icon").filter(|s| !s.is_empty()) {
        let icon = icon.to_lowercase();
        let icon_path = config.icons_dir.join(format!("{icon}.jpg"));
        if !icon_path.exists() {
            let bytes = fetch_bytes(&format!("{ICON_SITE}/{icon}.jpg"))?;
            std::fs::create_dir_all(&config.icons_dir)?;
            std::fs::write(&icon_path, bytes)?;
        }
    }
    Ok(())
}

fn fetch(url: &str) -> Result<ureq::Response> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match ureq::get(url).call() {
            Ok(response) => return Ok(response),
            Err(err) if attempt < RETRIES => {
                warn!(url, attempt, %err, "request failed, retrying");
                std::thread::sleep(Duration::from_secs(attempt as u64));
            }
            Err(err) => return Err(err).with_context(|| format!("fetching {url}")),
        }
    }
}

fn fetch_text(url: &str) -> Result<String> {
    Ok(fetch(url)?.into_string()?)
}

fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    fetch(url)?.into_reader().read_to_end(&mut bytes)?;
    Ok(bytes)
}
