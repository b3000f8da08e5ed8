//! Build configuration: named database variants loaded from TOML.
//!
//! Expected file shape:
//!
//! ```toml
//! cache_dir = "cache/items"
//! output_dir = "dist"
//!
//! [[databases]]
//! name = "feral"
//! suffix_types = ["agility", "striking", "the_tiger"]
//! item_list = "custom/feral.txt"
//! ```
//!
//! With no file present the built-in variants apply: the unfiltered `full`
//! build plus the four curated class builds.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::SuffixType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbVariant {
    pub name: String,
    /// Curated list file (`.json`, `.txt` or `.csv`); the master list when
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_list: Option<PathBuf>,
    /// Accepted suffix families; no filter when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix_types: Option<Vec<SuffixType>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub cache_dir: PathBuf,
    pub icons_dir: PathBuf,
    pub overrides_dir: PathBuf,
    pub output_dir: PathBuf,
    pub suffix_catalog: PathBuf,
    pub master_list: PathBuf,
    pub databases: Vec<DbVariant>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            cache_dir: "cache/items".into(),
            icons_dir: "cache/icons".into(),
            overrides_dir: "custom/overrides".into(),
            output_dir: "dist".into(),
            suffix_catalog: "cache/itemSuffix.json".into(),
            master_list: "cache/itemList-master.json".into(),
            databases: presets(),
        }
    }
}

impl BuildConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Load `path` when it exists, otherwise the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn variant(&self, name: &str) -> Option<&DbVariant> {
        self.databases.iter().find(|db| db.name == name)
    }
}

fn presets() -> Vec<DbVariant> {
    use SuffixType::*;
    let curated = |name: &str, suffix_types: &[SuffixType]| DbVariant {
        name: name.to_owned(),
        item_list: Some(format!("custom/{name}.csv").into()),
        suffix_types: Some(suffix_types.to_vec()),
    };
    vec![
        DbVariant {
            name: "full".to_owned(),
            item_list: None,
            suffix_types: None,
        },
        curated(
            "moonkin",
            &[ArcaneWrath, NaturesWrath, Sorcery, Restoration],
        ),
        curated("warlock", &[ShadowWrath, FieryWrath, Sorcery]),
        curated("mage", &[FieryWrath, FrozenWrath, Sorcery]),
        curated(
            "feral",
            &[
                Agility, Striking, TheTiger, TheBear, TheMonkey, TheWolf, TheFalcon, Stamina,
                Eluding, Power,
            ],
        ),
    ]
}
