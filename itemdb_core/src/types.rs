use serde::{Deserialize, Serialize};

use crate::text::{fuzzify, fuzzy_eq};

/// One random-enchantment family, e.g. everything "of the Bear".
///
/// Two catalog entries may share a suffix type and differ only by bonus
/// values ("+4 Stamina" vs "+6 Stamina" are both `Stamina`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixType {
    Agility,
    ArcaneResistance,
    ArcaneWrath,
    BeastSlaying,
    Blocking,
    Concentration,
    CriticalStrike,
    Defense,
    Eluding,
    FieryWrath,
    FireResistance,
    FrostResistance,
    FrozenWrath,
    Healing,
    HolyWrath,
    Intellect,
    Marksmanship,
    NatureResistance,
    NaturesWrath,
    Power,
    Proficiency,
    Quality,
    Regeneration,
    Restoration,
    Retaliation,
    ShadowResistance,
    ShadowWrath,
    Sorcery,
    Spirit,
    Stamina,
    Strength,
    Striking,
    TheBear,
    TheBoar,
    TheEagle,
    TheFalcon,
    TheGorilla,
    TheMonkey,
    TheOwl,
    TheTiger,
    TheWhale,
    TheWolf,
    Toughness,
    Twain,
}

impl SuffixType {
    pub const ALL: [SuffixType; 44] = [
        SuffixType::Agility,
        SuffixType::ArcaneResistance,
        SuffixType::ArcaneWrath,
        SuffixType::BeastSlaying,
        SuffixType::Blocking,
        SuffixType::Concentration,
        SuffixType::CriticalStrike,
        SuffixType::Defense,
        SuffixType::Eluding,
        SuffixType::FieryWrath,
        SuffixType::FireResistance,
        SuffixType::FrostResistance,
        SuffixType::FrozenWrath,
        SuffixType::Healing,
        SuffixType::HolyWrath,
        SuffixType::Intellect,
        SuffixType::Marksmanship,
        SuffixType::NatureResistance,
        SuffixType::NaturesWrath,
        SuffixType::Power,
        SuffixType::Proficiency,
        SuffixType::Quality,
        SuffixType::Regeneration,
        SuffixType::Restoration,
        SuffixType::Retaliation,
        SuffixType::ShadowResistance,
        SuffixType::ShadowWrath,
        SuffixType::Sorcery,
        SuffixType::Spirit,
        SuffixType::Stamina,
        SuffixType::Strength,
        SuffixType::Striking,
        SuffixType::TheBear,
        SuffixType::TheBoar,
        SuffixType::TheEagle,
        SuffixType::TheFalcon,
        SuffixType::TheGorilla,
        SuffixType::TheMonkey,
        SuffixType::TheOwl,
        SuffixType::TheTiger,
        SuffixType::TheWhale,
        SuffixType::TheWolf,
        SuffixType::Toughness,
        SuffixType::Twain,
    ];

    /// The display phrase appended to an item name when a variant of this
    /// family is derived ("Hat" + `Stamina` -> "Hat of Stamina").
    ///
    /// One closed table, also used in reverse by [`SuffixType::from_text`].
    /// The enumeration being closed makes the table total, so every suffix
    /// type decorates the name.
    pub fn phrase(self) -> &'static str {
        match self {
            SuffixType::Agility => "of Agility",
            SuffixType::ArcaneResistance => "of Arcane Resistance",
            SuffixType::ArcaneWrath => "of Arcane Wrath",
            SuffixType::BeastSlaying => "of Beast Slaying",
            SuffixType::Blocking => "of Blocking",
            SuffixType::Concentration => "of Concentration",
            SuffixType::CriticalStrike => "of Critical Strike",
            SuffixType::Defense => "of Defense",
            SuffixType::Eluding => "of Eluding",
            SuffixType::FieryWrath => "of Fiery Wrath",
            SuffixType::FireResistance => "of Fire Resistance",
            SuffixType::FrostResistance => "of Frost Resistance",
            SuffixType::FrozenWrath => "of Frozen Wrath",
            SuffixType::Healing => "of Healing",
            SuffixType::HolyWrath => "of Holy Wrath",
            SuffixType::Intellect => "of Intellect",
            SuffixType::Marksmanship => "of Marksmanship",
            SuffixType::NatureResistance => "of Nature Resistance",
            SuffixType::NaturesWrath => "of Nature's Wrath",
            SuffixType::Power => "of Power",
            SuffixType::Proficiency => "of Proficiency",
            SuffixType::Quality => "of Quality",
            SuffixType::Regeneration => "of Regeneration",
            SuffixType::Restoration => "of Restoration",
            SuffixType::Retaliation => "of Retaliation",
            SuffixType::ShadowResistance => "of Shadow Resistance",
            SuffixType::ShadowWrath => "of Shadow Wrath",
            SuffixType::Sorcery => "of Sorcery",
            SuffixType::Spirit => "of Spirit",
            SuffixType::Stamina => "of Stamina",
            SuffixType::Strength => "of Strength",
            SuffixType::Striking => "of Striking",
            SuffixType::TheBear => "of the Bear",
            SuffixType::TheBoar => "of the Boar",
            SuffixType::TheEagle => "of the Eagle",
            SuffixType::TheFalcon => "of the Falcon",
            SuffixType::TheGorilla => "of the Gorilla",
            SuffixType::TheMonkey => "of the Monkey",
            SuffixType::TheOwl => "of the Owl",
            SuffixType::TheTiger => "of the Tiger",
            SuffixType::TheWhale => "of the Whale",
            SuffixType::TheWolf => "of the Wolf",
            SuffixType::Toughness => "of Toughness",
            SuffixType::Twain => "of Twain",
        }
    }

    /// Recognize a suffix type from free text: either a bare phrase as
    /// scraped from an enchant heading ("of the Bear.") or a full decorated
    /// item name ("Blesswind Hammer of Arcane Wrath").
    ///
    /// Comparison goes through the fuzzy normalization, and the longest
    /// matching phrase wins so "of Nature Resistance" is never shadowed by
    /// a shorter overlap.
    pub fn from_text(text: &str) -> Option<SuffixType> {
        let fuzzy = fuzzify(text);
        let mut best: Option<(SuffixType, usize)> = None;
        for suffix_type in SuffixType::ALL {
            let phrase = fuzzify(suffix_type.phrase());
            if fuzzy.ends_with(&phrase) {
                match best {
                    Some((_, len)) if len >= phrase.len() => {}
                    _ => best = Some((suffix_type, phrase.len())),
                }
            }
        }
        best.map(|(suffix_type, _)| suffix_type)
    }
}

/// An `Item` stat slot a bonus can land in. Used by the bonus-type mapping
/// table so the application of deltas stays data-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    Agility,
    ArcaneResistance,
    ArcaneDamage,
    Armor,
    AttackPower,
    BeastSlaying,
    BlockChance,
    MeleeCrit,
    RangedCrit,
    SpellDamage,
    SpellHealing,
    Defense,
    Dodge,
    FireResistance,
    FireDamage,
    FrostResistance,
    FrostDamage,
    Hp5,
    HolyDamage,
    Intellect,
    Mp5,
    NatureResistance,
    NatureDamage,
    RangedAttackPower,
    ShadowResistance,
    ShadowDamage,
    Spirit,
    Stamina,
    Strength,
    AxeSkill,
    BowSkill,
    DaggerSkill,
    GunSkill,
    MaceSkill,
    SwordSkill,
    TwoHandedAxeSkill,
    TwoHandedMaceSkill,
    TwoHandedSwordSkill,
}

/// One stat-delta kind a suffix bonus can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusType {
    Agility,
    ArcaneResistance,
    ArcaneSpellDamage,
    Armor,
    AttackPower,
    BeastSlaying,
    Block,
    CriticalHit,
    Damage,
    DamageAndHealingSpells,
    Defense,
    Dodge,
    FireResistance,
    FireSpellDamage,
    FrostResistance,
    FrostSpellDamage,
    HealingSpells,
    HealthEvery5,
    HolySpellDamage,
    Intellect,
    ManaEvery5,
    NatureResistance,
    NatureSpellDamage,
    RangedAttackPower,
    ShadowResistance,
    ShadowSpellDamage,
    Spirit,
    Stamina,
    Strength,
    AxeSkill,
    BowSkill,
    DaggerSkill,
    GunSkill,
    MaceSkill,
    SwordSkill,
    TwoHandedAxeSkill,
    TwoHandedMaceSkill,
    TwoHandedSwordSkill,
    OnGetHitShadowBolt,
}

impl BonusType {
    /// Stat field(s) this bonus applies to, additively.
    ///
    /// `CriticalHit` is the one fan-out in the table: it always lands on
    /// both melee and ranged crit. `Damage` never shipped in game and
    /// `OnGetHitShadowBolt` is a proc with no stat slot; both map to
    /// nothing.
    pub fn targets(self) -> &'static [StatField] {
        match self {
            BonusType::Agility => &[StatField::Agility],
            BonusType::ArcaneResistance => &[StatField::ArcaneResistance],
            BonusType::ArcaneSpellDamage => &[StatField::ArcaneDamage],
            BonusType::Armor => &[StatField::Armor],
            BonusType::AttackPower => &[StatField::AttackPower],
            BonusType::BeastSlaying => &[StatField::BeastSlaying],
            BonusType::Block => &[StatField::BlockChance],
            BonusType::CriticalHit => &[StatField::MeleeCrit, StatField::RangedCrit],
            BonusType::Damage => &[],
            BonusType::DamageAndHealingSpells => {
                &[StatField::SpellDamage, StatField::SpellHealing]
            }
            BonusType::Defense => &[StatField::Defense],
            BonusType::Dodge => &[StatField::Dodge],
            BonusType::FireResistance => &[StatField::FireResistance],
            BonusType::FireSpellDamage => &[StatField::FireDamage],
            BonusType::FrostResistance => &[StatField::FrostResistance],
            BonusType::FrostSpellDamage => &[StatField::FrostDamage],
            BonusType::HealingSpells => &[StatField::SpellHealing],
            BonusType::HealthEvery5 => &[StatField::Hp5],
            BonusType::HolySpellDamage => &[StatField::HolyDamage],
            BonusType::Intellect => &[StatField::Intellect],
            BonusType::ManaEvery5 => &[StatField::Mp5],
            BonusType::NatureResistance => &[StatField::NatureResistance],
            BonusType::NatureSpellDamage => &[StatField::NatureDamage],
            BonusType::RangedAttackPower => &[StatField::RangedAttackPower],
            BonusType::ShadowResistance => &[StatField::ShadowResistance],
            BonusType::ShadowSpellDamage => &[StatField::ShadowDamage],
            BonusType::Spirit => &[StatField::Spirit],
            BonusType::Stamina => &[StatField::Stamina],
            BonusType::Strength => &[StatField::Strength],
            BonusType::AxeSkill => &[StatField::AxeSkill],
            BonusType::BowSkill => &[StatField::BowSkill],
            BonusType::DaggerSkill => &[StatField::DaggerSkill],
            BonusType::GunSkill => &[StatField::GunSkill],
            BonusType::MaceSkill => &[StatField::MaceSkill],
            BonusType::SwordSkill => &[StatField::SwordSkill],
            BonusType::TwoHandedAxeSkill => &[StatField::TwoHandedAxeSkill],
            BonusType::TwoHandedMaceSkill => &[StatField::TwoHandedMaceSkill],
            BonusType::TwoHandedSwordSkill => &[StatField::TwoHandedSwordSkill],
            BonusType::OnGetHitShadowBolt => &[],
        }
    }
}

/// Playable classes. Discriminants match the source site's class ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayableClass {
    Warrior = 0,
    Paladin = 1,
    Hunter = 2,
    Rogue = 3,
    Priest = 4,
    Shaman = 6,
    Mage = 7,
    Warlock = 8,
    Druid = 10,
}

impl PlayableClass {
    pub const ALL: [PlayableClass; 9] = [
        PlayableClass::Warrior,
        PlayableClass::Paladin,
        PlayableClass::Hunter,
        PlayableClass::Rogue,
        PlayableClass::Priest,
        PlayableClass::Shaman,
        PlayableClass::Mage,
        PlayableClass::Warlock,
        PlayableClass::Druid,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlayableClass::Warrior => "Warrior",
            PlayableClass::Paladin => "Paladin",
            PlayableClass::Hunter => "Hunter",
            PlayableClass::Rogue => "Rogue",
            PlayableClass::Priest => "Priest",
            PlayableClass::Shaman => "Shaman",
            PlayableClass::Mage => "Mage",
            PlayableClass::Warlock => "Warlock",
            PlayableClass::Druid => "Druid",
        }
    }

    pub fn from_text(text: &str) -> Option<PlayableClass> {
        PlayableClass::ALL
            .into_iter()
            .find(|class| fuzzy_eq(class.name(), text))
    }
}

/// Parse the tooltip's comma-separated class list ("Warrior, Paladin") into
/// playable classes. Unrecognized entries are skipped.
pub fn playable_classes_from_text(text: &str) -> Vec<PlayableClass> {
    text.split(',')
        .filter_map(PlayableClass::from_text)
        .collect()
}

/// Target-type conditional bonus bits ("Increases damage done to Undead").
pub mod target_mask {
    pub const UNDEAD: u8 = 1 << 0;
    pub const DEMON: u8 = 1 << 1;
}

/// Faction rank gates, 1 (lowest) through 14. Both factions' rank titles
/// map onto the same ladder.
pub fn pvp_rank_from_text(text: &str) -> Option<u8> {
    const ALLIANCE: [&str; 14] = [
        "Private",
        "Corporal",
        "Sergeant",
        "Master Sergeant",
        "Sergeant Major",
        "Knight",
        "Knight-Lieutenant",
        "Knight-Captain",
        "Knight-Champion",
        "Lieutenant Commander",
        "Commander",
        "Marshal",
        "Field Marshal",
        "Grand Marshal",
    ];
    const HORDE: [&str; 14] = [
        "Scout",
        "Grunt",
        "Sergeant",
        "Senior Sergeant",
        "First Sergeant",
        "Stone Guard",
        "Blood Guard",
        "Legionnaire",
        "Centurion",
        "Champion",
        "Lieutenant General",
        "General",
        "Warlord",
        "High Warlord",
    ];

    // Longest title wins: "Lieutenant Commander" contains "Commander" and
    // "Master Sergeant" contains "Sergeant".
    let mut best: Option<(u8, usize)> = None;
    for ranks in [&ALLIANCE, &HORDE] {
        for (i, name) in ranks.iter().enumerate() {
            if crate::text::fuzzy_contains(text, name) {
                let len = fuzzify(name).len();
                match best {
                    Some((_, best_len)) if best_len >= len => {}
                    _ => best = Some(((i + 1) as u8, len)),
                }
            }
        }
    }
    best.map(|(rank, _)| rank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_type_from_phrase() {
        assert_eq!(SuffixType::from_text("of the Bear"), Some(SuffixType::TheBear));
        assert_eq!(SuffixType::from_text("of the Bear."), Some(SuffixType::TheBear));
        assert_eq!(SuffixType::from_text("OF THE BEAR"), Some(SuffixType::TheBear));
        assert_eq!(
            SuffixType::from_text("of Nature's Wrath"),
            Some(SuffixType::NaturesWrath)
        );
        assert_eq!(SuffixType::from_text("of Nothing Known"), None);
    }

    #[test]
    fn suffix_type_from_item_name() {
        assert_eq!(
            SuffixType::from_text("Blesswind Hammer of Arcane Wrath"),
            Some(SuffixType::ArcaneWrath)
        );
        assert_eq!(
            SuffixType::from_text("Ring of Nature Resistance"),
            Some(SuffixType::NatureResistance)
        );
    }

    #[test]
    fn critical_hit_fans_out() {
        assert_eq!(
            BonusType::CriticalHit.targets(),
            &[StatField::MeleeCrit, StatField::RangedCrit]
        );
        assert!(BonusType::Damage.targets().is_empty());
    }

    #[test]
    fn classes_from_comma_text() {
        assert_eq!(
            playable_classes_from_text("Warrior, Paladin"),
            vec![PlayableClass::Warrior, PlayableClass::Paladin]
        );
        assert!(playable_classes_from_text("Gnome Engineer").is_empty());
    }

    #[test]
    fn pvp_ranks() {
        assert_eq!(pvp_rank_from_text("Knight-Captain"), Some(8));
        assert_eq!(pvp_rank_from_text("Scout"), Some(1));
        assert_eq!(pvp_rank_from_text("High Warlord"), Some(14));
        assert_eq!(pvp_rank_from_text("Lieutenant Commander"), Some(10));
        assert_eq!(pvp_rank_from_text("Peasant"), None);
    }
}
