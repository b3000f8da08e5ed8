//! Deriving resolved item variants from a base item plus a suffix definition.

use crate::item::Item;
use crate::suffix::ItemSuffix;

/// Produce the fully-resolved variant of `base` for one suffix definition.
///
/// The variant is an independent copy: candidate ids are cleared, the
/// definition's id is pinned, every bonus is summed into its stat field and
/// the display name gains the definition's phrase. The phrase table is
/// total over the closed enumeration, so every variant gets decorated.
pub fn derive(base: &Item, suffix: &ItemSuffix) -> Item {
    let mut item = base.clone();
    item.valid_suffix_ids = None;
    item.suffix_id = Some(suffix.id);
    for bonus in &suffix.bonus {
        item.apply_bonus(bonus.bonus_type, bonus.value);
    }
    item.name = format!("{} {}", item.name, suffix.suffix_type.phrase());
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suffix::Bonus;
    use crate::types::{BonusType, SuffixType};

    fn bear() -> ItemSuffix {
        ItemSuffix {
            id: 588,
            suffix_type: SuffixType::TheBear,
            bonus: vec![
                Bonus {
                    bonus_type: BonusType::Agility,
                    value: 4,
                },
                Bonus {
                    bonus_type: BonusType::Stamina,
                    value: 4,
                },
            ],
        }
    }

    #[test]
    fn variant_sums_bonuses_and_decorates_name() {
        let mut base = Item::new(13107, "Magiskull Cuffs");
        base.stamina = Some(3);
        base.valid_suffix_ids = Some(vec![588, 589]);

        let variant = derive(&base, &bear());
        assert_eq!(variant.name, "Magiskull Cuffs of the Bear");
        assert_eq!(variant.suffix_id, Some(588));
        assert_eq!(variant.valid_suffix_ids, None);
        assert_eq!(variant.agility, Some(4));
        assert_eq!(variant.stamina, Some(7));

        // Base untouched.
        assert_eq!(base.name, "Magiskull Cuffs");
        assert_eq!(base.stamina, Some(3));
        assert_eq!(base.agility, None);
    }

    #[test]
    fn derivation_is_deterministic() {
        let mut base = Item::new(13107, "Magiskull Cuffs");
        base.stamina = Some(3);
        base.valid_suffix_ids = Some(vec![588]);
        assert_eq!(derive(&base, &bear()), derive(&base, &bear()));
    }

    #[test]
    fn cancelling_bonus_leaves_field_absent() {
        let mut base = Item::new(1, "Test Ring");
        base.stamina = Some(4);
        let suffix = ItemSuffix {
            id: 2,
            suffix_type: SuffixType::Stamina,
            bonus: vec![Bonus {
                bonus_type: BonusType::Stamina,
                value: -4,
            }],
        };
        let variant = derive(&base, &suffix);
        assert_eq!(variant.stamina, None);
    }

    #[test]
    fn critical_hit_fans_out_to_both_crit_fields() {
        let base = Item::new(1, "Sharp Dagger");
        let suffix = ItemSuffix {
            id: 3,
            suffix_type: SuffixType::Striking,
            bonus: vec![Bonus {
                bonus_type: BonusType::CriticalHit,
                value: 1,
            }],
        };
        let variant = derive(&base, &suffix);
        assert_eq!(variant.melee_crit, Some(1));
        assert_eq!(variant.ranged_crit, Some(1));
    }
}
