use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::types::SuffixType;

/// One (kind, delta) stat bonus belonging to a suffix definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bonus {
    #[serde(rename = "type")]
    pub bonus_type: crate::types::BonusType,
    pub value: i32,
}

/// A catalog entry describing one random-enchantment definition: a family
/// tag plus one or two ordered bonuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSuffix {
    pub id: u32,
    #[serde(rename = "type")]
    pub suffix_type: SuffixType,
    pub bonus: Vec<Bonus>,
}

impl ItemSuffix {
    /// The definition's (first, second) bonus values; a missing second
    /// bonus counts as 0 for comparison purposes.
    pub fn values(&self) -> (i32, i32) {
        (
            self.bonus.first().map_or(0, |b| b.value),
            self.bonus.get(1).map_or(0, |b| b.value),
        )
    }

    /// Identity under structural equality: the family tag and ordered bonus
    /// list, ignoring the numeric id. Deduplication and catalog-uniqueness
    /// both key on this.
    pub fn structural_key(&self) -> (SuffixType, Vec<Bonus>) {
        (self.suffix_type, self.bonus.clone())
    }
}

/// The deduplicated, read-only index of all known suffix definitions.
///
/// Queries are linear scans; the catalog holds a few hundred entries and is
/// loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct SuffixCatalog {
    suffixes: Vec<ItemSuffix>,
}

impl SuffixCatalog {
    /// Build a catalog, rejecting structural duplicates up front so that a
    /// (tag, value-pair) lookup can never be ambiguous.
    pub fn new(suffixes: Vec<ItemSuffix>) -> Result<Self> {
        for (i, a) in suffixes.iter().enumerate() {
            for b in &suffixes[i + 1..] {
                if a.suffix_type == b.suffix_type && a.bonus == b.bonus {
                    return Err(Error::DuplicateSuffix {
                        id_a: a.id,
                        id_b: b.id,
                        suffix_type: a.suffix_type,
                    });
                }
            }
        }
        Ok(SuffixCatalog { suffixes })
    }

    /// Load the catalog from its JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let suffixes: Vec<ItemSuffix> = serde_json::from_str(&json)?;
        Self::new(suffixes)
    }

    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemSuffix> {
        self.suffixes.iter()
    }

    pub fn find_by_id(&self, id: u32) -> Option<&ItemSuffix> {
        self.suffixes.iter().find(|s| s.id == id)
    }

    pub fn find_by_type(&self, suffix_type: SuffixType) -> Vec<&ItemSuffix> {
        self.suffixes
            .iter()
            .filter(|s| s.suffix_type == suffix_type)
            .collect()
    }

    /// All definitions of `suffix_type` whose bonus values equal the
    /// candidate pair, order-sensitive. `second == None` is the wildcard
    /// mode used when only one value is known (spreadsheet-sourced data):
    /// only the first value has to match.
    ///
    /// With load-time uniqueness this returns at most one entry; if it ever
    /// returns more the ambiguity is surfaced rather than tie-broken.
    pub fn find_by_type_and_values(
        &self,
        suffix_type: SuffixType,
        first: i32,
        second: Option<i32>,
    ) -> Vec<&ItemSuffix> {
        let matches: Vec<&ItemSuffix> = self
            .suffixes
            .iter()
            .filter(|s| s.suffix_type == suffix_type)
            .filter(|s| {
                let (a, b) = s.values();
                a == first && second.map_or(true, |v| b == v)
            })
            .collect();
        if matches.len() > 1 {
            warn!(
                ?suffix_type,
                first,
                ?second,
                ids = ?matches.iter().map(|s| s.id).collect::<Vec<_>>(),
                "ambiguous suffix match"
            );
        }
        matches
    }

    /// Resolve a decorated item name plus one known bonus value to a single
    /// definition ("Blesswind Hammer of Arcane Wrath" + 14). Wildcard on the
    /// second value; first match wins, as only one can exist per catalog
    /// uniqueness.
    pub fn find_by_name_and_value(&self, item_name: &str, value: i32) -> Option<&ItemSuffix> {
        let suffix_type = SuffixType::from_text(item_name)?;
        self.find_by_type_and_values(suffix_type, value, None)
            .into_iter()
            .next()
    }
}
