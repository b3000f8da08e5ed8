//! Matching random-enchantment tooltip lines against the suffix catalog.

use tracing::debug;

use crate::markup;
use crate::suffix::SuffixCatalog;
use crate::types::SuffixType;

/// Candidate integer values parsed out of one bonus clause.
///
/// `+(6 - 7) Stamina` denotes two distinct variants with values 6 and 7,
/// never the span between them. Anything else yields the single leading
/// signed/percent number, or nothing when the clause has no number.
pub fn parse_bonus_values(clause: &str) -> Vec<i32> {
    let clause = clause.trim();
    if let (Some(open), Some(close)) = (clause.find('('), clause.find(')')) {
        if open < close {
            return clause[open + 1..close]
                .replace([' ', '%', '+'], "")
                .split('-')
                .filter_map(|v| v.parse().ok())
                .collect();
        }
    }
    let number: String = clause
        .chars()
        .skip_while(|c| !c.is_ascii_digit() && *c != '-')
        .take_while(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    number.parse().into_iter().collect()
}

/// Resolve a tooltip random-enchant section to catalog definition ids.
///
/// The section is a `<ul>` of `<li>` lines, each carrying a `<span>` with the
/// suffix phrase, a `<small>` drop-chance annotation and the bonus text in
/// between. Ids are appended in the order encountered, duplicates preserved;
/// deduplication is the aggregator's job.
pub fn resolve(
    catalog: &SuffixCatalog,
    enchant_section: &str,
    accepted: Option<&[SuffixType]>,
) -> Vec<u32> {
    let mut ids = Vec::new();
    for line in markup::blocks(enchant_section, "li") {
        let Some((phrase, rest)) = markup::take_block(line, "span") else {
            continue;
        };
        let Some(suffix_type) = SuffixType::from_text(&phrase) else {
            debug!(%phrase, "unrecognized suffix phrase");
            continue;
        };
        if let Some(accepted) = accepted {
            if !accepted.contains(&suffix_type) {
                continue;
            }
        }
        let rest = match markup::take_block(&rest, "small") {
            Some((_, rest)) => rest,
            None => rest,
        };
        let bonus_text = markup::strip_tags(&rest);
        let before = ids.len();
        for (first, second) in candidate_pairs(&bonus_text) {
            for def in catalog.find_by_type_and_values(suffix_type, first, Some(second)) {
                ids.push(def.id);
            }
        }
        if ids.len() == before {
            debug!(%phrase, bonus = bonus_text.trim(), "unmatched enchant line");
        }
    }
    ids
}

/// Expand a bonus line into ordered (first, second) value pairs.
///
/// A line holds one or two comma-separated clauses; each clause contributes
/// one or two candidate values, and the pairs are their cross product. A
/// missing second clause pairs every first-clause value with 0, mirroring the
/// implicit zero slot of single-bonus definitions.
fn candidate_pairs(bonus_text: &str) -> Vec<(i32, i32)> {
    let mut clauses = bonus_text.splitn(2, ',');
    let first = clauses
        .next()
        .map(parse_bonus_values)
        .unwrap_or_default();
    let second = clauses
        .next()
        .map(parse_bonus_values)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| vec![0]);
    let mut pairs = Vec::with_capacity(first.len() * second.len());
    for &a in &first {
        for &b in &second {
            pairs.push((a, b));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suffix::{Bonus, ItemSuffix};
    use crate::types::BonusType;

    fn catalog() -> SuffixCatalog {
        let def = |id, suffix_type, bonus: &[(BonusType, i32)]| ItemSuffix {
            id,
            suffix_type,
            bonus: bonus
                .iter()
                .map(|&(bonus_type, value)| Bonus { bonus_type, value })
                .collect(),
        };
        SuffixCatalog::new(vec![
            def(9, SuffixType::Stamina, &[(BonusType::Stamina, 6)]),
            def(10, SuffixType::Stamina, &[(BonusType::Stamina, 7)]),
            def(
                588,
                SuffixType::TheBear,
                &[(BonusType::Agility, 4), (BonusType::Stamina, 4)],
            ),
            def(
                1147,
                SuffixType::NatureResistance,
                &[(BonusType::NatureResistance, 5)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn parenthesized_phrase_is_two_values_not_a_range() {
        assert_eq!(parse_bonus_values("+(6 - 7) Stamina"), vec![6, 7]);
        assert_eq!(parse_bonus_values("+(3 - 5)% Critical Strike"), vec![3, 5]);
    }

    #[test]
    fn plain_phrase_is_one_value() {
        assert_eq!(parse_bonus_values("+4 Agility"), vec![4]);
        assert_eq!(parse_bonus_values("+1% Dodge"), vec![1]);
        assert_eq!(parse_bonus_values("no number here"), Vec::<i32>::new());
    }

    #[test]
    fn range_line_yields_both_variants_in_order() {
        let section =
            "<ul><li><span>of Stamina</span>+(6 - 7) Stamina<small>(14% chance)</small></li></ul>";
        assert_eq!(resolve(&catalog(), section, None), vec![9, 10]);
    }

    #[test]
    fn two_clause_line_matches_ordered_pair() {
        let section =
            "<ul><li><span>of the Bear</span>+4 Agility, +4 Stamina<small>(2% chance)</small></li></ul>";
        assert_eq!(resolve(&catalog(), section, None), vec![588]);
    }

    #[test]
    fn accepted_filter_discards_other_tags() {
        let section = "<ul>\
            <li><span>of Stamina</span>+6 Stamina<small>(14%)</small></li>\
            <li><span>of Nature Resistance</span>+5 Nature Resistance<small>(5%)</small></li>\
            </ul>";
        let catalog = catalog();
        assert_eq!(resolve(&catalog, section, None), vec![9, 1147]);
        assert_eq!(
            resolve(&catalog, section, Some(&[SuffixType::NatureResistance])),
            vec![1147]
        );
    }

    #[test]
    fn unmatched_line_contributes_nothing() {
        let section = "<ul><li><span>of Stamina</span>+99 Stamina<small>(1%)</small></li></ul>";
        assert!(resolve(&catalog(), section, None).is_empty());
    }
}
