//! Fuzzy string normalization.
//!
//! Every tag/name comparison in the crate routes through [`fuzzify`]; the
//! normalized form is the source of truth for equality, never the raw
//! display string.

/// Characters stripped by the fuzzy normalization, alongside lower-casing.
const STRIPPED: &[char] = &[' ', '\'', '"', '(', ')', ':', '-', '%', ',', '.', '!'];

/// Lower-case `s` and strip spaces and punctuation.
pub fn fuzzify(s: &str) -> String {
    s.chars()
        .filter(|c| !STRIPPED.contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Case/space/punctuation-insensitive equality.
pub fn fuzzy_eq(a: &str, b: &str) -> bool {
    fuzzify(a) == fuzzify(b)
}

/// `true` if `needle` occurs in `haystack` after normalization.
pub fn fuzzy_contains(haystack: &str, needle: &str) -> bool {
    fuzzify(haystack).contains(&fuzzify(needle))
}

/// The source site's URL/file form of an item name: punctuation stripped,
/// spaces dashed, lower-cased. Cached documents are keyed
/// `{id}-{dashify(name)}`.
pub fn dashify(s: &str) -> String {
    s.replace('\'', "")
        .replace('"', "")
        .replace(',', "")
        .replace(':', "")
        .replace(" - ", "-")
        .replace(' ', "-")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzify_strips_and_lowers() {
        assert_eq!(fuzzify("+(6 - 7) Stamina"), "+67stamina");
        assert_eq!(fuzzify("of the Bear."), "ofthebear");
    }

    #[test]
    fn fuzzy_eq_is_insensitive() {
        assert!(fuzzy_eq("of the Bear.", "OF THE BEAR"));
        assert!(fuzzy_eq("Nature's Wrath", "natures wrath"));
        assert!(!fuzzy_eq("of the Bear", "of the Boar"));
    }

    #[test]
    fn fuzzy_contains_substring() {
        assert!(fuzzy_contains("Hammer of Arcane Wrath", "arcane-wrath"));
        assert!(!fuzzy_contains("Hammer", "of"));
    }

    #[test]
    fn dashify_matches_document_names() {
        assert_eq!(dashify("Hanzo Sword"), "hanzo-sword");
        assert_eq!(dashify("Alcor's Sunrazor"), "alcors-sunrazor");
        assert_eq!(dashify("Mark of Fordring - Test"), "mark-of-fordring-test");
    }
}
