use serde::{Deserialize, Serialize};

use crate::types::{BonusType, PlayableClass, StatField};

/// One catalog entry with all attributes resolved.
///
/// Every stat field is optional: `None` means "not applicable" and is
/// omitted from the serialized record, which is what keeps the output
/// databases sparse. An explicit zero never appears — zero-valued stats are
/// normalized to `None` on the way in ([`zsum`]) and on the way out of
/// extraction.
///
/// A record is either a base item (optionally carrying `valid_suffix_ids`,
/// the enchant families it could resolve to) or a derived variant (carrying
/// `suffix_id`), never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    // identification
    pub id: u32,
    pub name: String,
    pub slot: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_suffix_ids: Option<Vec<u32>>,

    // classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subclass: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durability: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,

    // requirements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req_level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowable_classes: Option<Vec<PlayableClass>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pvp_rank: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_mask: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boss: Option<String>,

    // primary stats
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agility: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stamina: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intellect: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spirit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hp5: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mp5: Option<i32>,

    // defensive stats
    #[serde(skip_serializing_if = "Option::is_none")]
    pub armor: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defense: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dodge: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parry: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_chance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_value: Option<i32>,

    // hit / crit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub melee_hit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranged_hit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spell_hit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub melee_crit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranged_crit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spell_crit: Option<i32>,

    // power and spell stats
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spell_penetration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_power: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feral_attack_power: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub melee_attack_power: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranged_attack_power: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spell_healing: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spell_damage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arcane_damage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fire_damage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frost_damage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nature_damage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_damage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holy_damage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beast_slaying: Option<i32>,

    // weapon statistics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranged_dps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub melee_dps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranged_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub melee_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranged_min_dmg: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub melee_min_dmg: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranged_max_dmg: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub melee_max_dmg: Option<i32>,

    // weapon skills
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axe_skill: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bow_skill: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dagger_skill: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gun_skill: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mace_skill: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sword_skill: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_handed_axe_skill: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_handed_mace_skill: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_handed_sword_skill: Option<i32>,

    // resistances
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arcane_resistance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fire_resistance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frost_resistance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nature_resistance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_resistance: Option<i32>,
}

impl Item {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Item {
            id,
            name: name.into(),
            ..Item::default()
        }
    }

    /// Mutable access to a stat slot by field key; the indirection that lets
    /// bonus application stay a table walk.
    pub fn stat_mut(&mut self, field: StatField) -> &mut Option<i32> {
        match field {
            StatField::Agility => &mut self.agility,
            StatField::ArcaneResistance => &mut self.arcane_resistance,
            StatField::ArcaneDamage => &mut self.arcane_damage,
            StatField::Armor => &mut self.armor,
            StatField::AttackPower => &mut self.attack_power,
            StatField::BeastSlaying => &mut self.beast_slaying,
            StatField::BlockChance => &mut self.block_chance,
            StatField::MeleeCrit => &mut self.melee_crit,
            StatField::RangedCrit => &mut self.ranged_crit,
            StatField::SpellDamage => &mut self.spell_damage,
            StatField::SpellHealing => &mut self.spell_healing,
            StatField::Defense => &mut self.defense,
            StatField::Dodge => &mut self.dodge,
            StatField::FireResistance => &mut self.fire_resistance,
            StatField::FireDamage => &mut self.fire_damage,
            StatField::FrostResistance => &mut self.frost_resistance,
            StatField::FrostDamage => &mut self.frost_damage,
            StatField::Hp5 => &mut self.hp5,
            StatField::HolyDamage => &mut self.holy_damage,
            StatField::Intellect => &mut self.intellect,
            StatField::Mp5 => &mut self.mp5,
            StatField::NatureResistance => &mut self.nature_resistance,
            StatField::NatureDamage => &mut self.nature_damage,
            StatField::RangedAttackPower => &mut self.ranged_attack_power,
            StatField::ShadowResistance => &mut self.shadow_resistance,
            StatField::ShadowDamage => &mut self.shadow_damage,
            StatField::Spirit => &mut self.spirit,
            StatField::Stamina => &mut self.stamina,
            StatField::Strength => &mut self.strength,
            StatField::AxeSkill => &mut self.axe_skill,
            StatField::BowSkill => &mut self.bow_skill,
            StatField::DaggerSkill => &mut self.dagger_skill,
            StatField::GunSkill => &mut self.gun_skill,
            StatField::MaceSkill => &mut self.mace_skill,
            StatField::SwordSkill => &mut self.sword_skill,
            StatField::TwoHandedAxeSkill => &mut self.two_handed_axe_skill,
            StatField::TwoHandedMaceSkill => &mut self.two_handed_mace_skill,
            StatField::TwoHandedSwordSkill => &mut self.two_handed_sword_skill,
        }
    }

    /// Add `value` to every stat slot the bonus type targets, keeping the
    /// zero-elision invariant.
    pub fn apply_bonus(&mut self, bonus_type: BonusType, value: i32) {
        for &field in bonus_type.targets() {
            let slot = self.stat_mut(field);
            *slot = zsum(*slot, value);
        }
    }

    /// Merge a per-item override record over this item, field by field.
    /// Fields present in `overrides` replace the extracted value; everything
    /// else is untouched.
    pub fn merge_override(&self, overrides: &serde_json::Value) -> serde_json::Result<Item> {
        let mut value = serde_json::to_value(self)?;
        if let (Some(base), Some(patch)) = (value.as_object_mut(), overrides.as_object()) {
            for (key, patch_value) in patch {
                base.insert(key.clone(), patch_value.clone());
            }
        }
        serde_json::from_value(value)
    }
}

/// Zero-eliding sum: `None` operands count as 0 and a zero result collapses
/// back to `None`.
pub fn zsum(current: Option<i32>, delta: i32) -> Option<i32> {
    match current.unwrap_or(0) + delta {
        0 => None,
        v => Some(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zsum_elides_zero() {
        assert_eq!(zsum(None, 4), Some(4));
        assert_eq!(zsum(Some(5), 4), Some(9));
        assert_eq!(zsum(Some(4), -4), None);
        assert_eq!(zsum(None, 0), None);
    }

    #[test]
    fn serialization_is_sparse() {
        let mut item = Item::new(1, "Hat");
        item.stamina = Some(5);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 1, "name": "Hat", "slot": 0, "stamina": 5 })
        );
    }

    #[test]
    fn critical_hit_applies_to_both_crits() {
        let mut item = Item::new(1, "Hat");
        item.melee_crit = Some(1);
        item.apply_bonus(BonusType::CriticalHit, 2);
        assert_eq!(item.melee_crit, Some(3));
        assert_eq!(item.ranged_crit, Some(2));
    }

    #[test]
    fn override_replaces_single_fields() {
        let mut item = Item::new(1, "Hat");
        item.stamina = Some(5);
        let patched = item
            .merge_override(&serde_json::json!({ "stamina": 7, "boss": "Onyxia" }))
            .unwrap();
        assert_eq!(patched.stamina, Some(7));
        assert_eq!(patched.boss.as_deref(), Some("Onyxia"));
        assert_eq!(patched.name, "Hat");
    }
}
