//! Turning one scraped document pair into a canonical [`Item`] record.

use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::item::Item;
use crate::markup;
use crate::types::{playable_classes_from_text, pvp_rank_from_text, target_mask};

/// The equip-attribute blob embedded in the XML document: a bare key:value
/// list of numeric stat codes. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EquipBlob {
    reqlevel: Option<i32>,
    dura: Option<i32>,
    slotbak: Option<i32>,

    str: Option<i32>,
    agi: Option<i32>,
    sta: Option<i32>,
    int: Option<i32>,
    spi: Option<i32>,
    healthrgn: Option<i32>,
    manargn: Option<i32>,

    armor: Option<i32>,
    def: Option<i32>,
    dodgepct: Option<i32>,
    parrypct: Option<i32>,
    blockpct: Option<i32>,
    blockamount: Option<i32>,

    mlehitpct: Option<i32>,
    rgdhitpct: Option<i32>,
    splhitpct: Option<i32>,
    mlecritstrkpct: Option<i32>,
    rgdcritstrkpct: Option<i32>,
    splcritstrkpct: Option<i32>,

    atkpwr: Option<i32>,
    feratkpwr: Option<i32>,
    mleatkpwr: Option<i32>,
    rgdatkpwr: Option<i32>,
    splpen: Option<i32>,
    splheal: Option<i32>,
    splpwr: Option<i32>,
    arcsplpwr: Option<i32>,
    firsplpwr: Option<i32>,
    frosplpwr: Option<i32>,
    natsplpwr: Option<i32>,
    shasplpwr: Option<i32>,
    holsplpwr: Option<i32>,

    rgddps: Option<f64>,
    mledps: Option<f64>,
    rgdspeed: Option<f64>,
    mlespeed: Option<f64>,
    rgddmgmin: Option<i32>,
    mledmgmin: Option<i32>,
    rgddmgmax: Option<i32>,
    mledmgmax: Option<i32>,

    arcres: Option<i32>,
    firres: Option<i32>,
    frores: Option<i32>,
    natres: Option<i32>,
    shares: Option<i32>,
}

/// Extraction result: the base item and, when the tooltip carries the random
/// enchant marker, the raw markup section listing its enchant lines.
#[derive(Debug)]
pub struct Extracted {
    pub item: Item,
    pub random_enchants_html: Option<String>,
}

/// Pure transform of the cached (xml, html) document pair for `id` into an
/// [`Item`]. Fails only when the identity fields cannot be located; every
/// other field is best-effort sparse.
pub fn extract(id: u32, xml: &str, html: &str) -> Result<Extracted> {
    let name = markup::tag_text(xml, "name")
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Error::MalformedDocument {
            id,
            reason: "missing name element".into(),
        })?;
    let equip = parse_equip_blob(id, markup::tag_text(xml, "jsonEquip").unwrap_or(""));

    let mut item = Item::new(id, name);
    item.slot = match markup::tag_attr(xml, "inventorySlot", "id").and_then(|v| v.parse().ok()) {
        Some(slot) => slot,
        None => {
            warn!(id, "invalid inventory slot, falling back to equip blob");
            equip.slotbak.unwrap_or(0)
        }
    };
    item.icon = markup::tag_text(xml, "icon")
        .filter(|s| !s.is_empty())
        .map(str::to_owned);
    item.class = attr_number(xml, "class");
    item.subclass = attr_number(xml, "subclass");
    item.level = attr_number(xml, "level");
    item.quality = attr_number(xml, "quality");

    item.req_level = zeroless(equip.reqlevel);
    item.durability = zeroless(equip.dura);
    item.strength = zeroless(equip.str);
    item.agility = zeroless(equip.agi);
    item.stamina = zeroless(equip.sta);
    item.intellect = zeroless(equip.int);
    item.spirit = zeroless(equip.spi);
    item.hp5 = zeroless(equip.healthrgn);
    item.mp5 = zeroless(equip.manargn);
    item.armor = zeroless(equip.armor);
    item.defense = zeroless(equip.def);
    item.dodge = zeroless(equip.dodgepct);
    item.parry = zeroless(equip.parrypct);
    item.block_chance = zeroless(equip.blockpct);
    item.block_value = zeroless(equip.blockamount);
    item.melee_hit = zeroless(equip.mlehitpct);
    item.ranged_hit = zeroless(equip.rgdhitpct);
    item.spell_hit = zeroless(equip.splhitpct);
    item.melee_crit = zeroless(equip.mlecritstrkpct);
    item.ranged_crit = zeroless(equip.rgdcritstrkpct);
    item.spell_crit = zeroless(equip.splcritstrkpct);
    item.attack_power = zeroless(equip.atkpwr);
    item.feral_attack_power = zeroless(equip.feratkpwr);
    item.melee_attack_power = zeroless(equip.mleatkpwr);
    item.ranged_attack_power = zeroless(equip.rgdatkpwr);
    item.spell_penetration = zeroless(equip.splpen);
    item.spell_healing = zeroless(equip.splheal);
    item.spell_damage = zeroless(equip.splpwr);
    item.arcane_damage = zeroless(equip.arcsplpwr);
    item.fire_damage = zeroless(equip.firsplpwr);
    item.frost_damage = zeroless(equip.frosplpwr);
    item.nature_damage = zeroless(equip.natsplpwr);
    item.shadow_damage = zeroless(equip.shasplpwr);
    item.holy_damage = zeroless(equip.holsplpwr);
    item.ranged_dps = zeroless_f(equip.rgddps);
    item.melee_dps = zeroless_f(equip.mledps);
    item.ranged_speed = zeroless_f(equip.rgdspeed);
    item.melee_speed = zeroless_f(equip.mlespeed);
    item.ranged_min_dmg = zeroless(equip.rgddmgmin);
    item.melee_min_dmg = zeroless(equip.mledmgmin);
    item.ranged_max_dmg = zeroless(equip.rgddmgmax);
    item.melee_max_dmg = zeroless(equip.mledmgmax);
    item.arcane_resistance = zeroless(equip.arcres);
    item.fire_resistance = zeroless(equip.firres);
    item.frost_resistance = zeroless(equip.frores);
    item.nature_resistance = zeroless(equip.natres);
    item.shadow_resistance = zeroless(equip.shares);

    let tooltip = markup::tag_text(xml, "htmlTooltip").unwrap_or("");
    item.unique = tooltip.contains(">Unique<").then_some(true);
    item.bop = (markup::comment_text(tooltip, "bo") == Some("Binds when picked up")).then_some(true);
    if tooltip.contains("Undead and Demons") {
        item.target_mask = Some(target_mask::UNDEAD | target_mask::DEMON);
    } else if tooltip.contains("Increases damage done to Undead") {
        item.target_mask = Some(target_mask::UNDEAD);
    }
    if let Some(dropped_by) = markup::class_text(tooltip, "whtt-droppedby") {
        if let Some(n) = dropped_by.find(':') {
            let boss = dropped_by[n + 1..].trim();
            if !boss.is_empty() {
                item.boss = Some(boss.to_owned());
            }
        }
    }
    if let Some(classes) = markup::class_text(tooltip, "wowhead-tooltip-item-classes") {
        // the element text carries a "Classes:" label before the names
        let names = match classes.split_once(':') {
            Some((_, names)) => names,
            None => classes.as_str(),
        };
        let classes = playable_classes_from_text(names);
        if !classes.is_empty() {
            item.allowable_classes = Some(classes);
        }
    }
    item.flavor = markup::blocks(tooltip, "span")
        .iter()
        .map(|b| markup::strip_tags(b))
        .find(|text| text.len() >= 2 && text.starts_with('"') && text.ends_with('"'));
    let rank_icon = markup::class_text(tooltip, "icon-horde")
        .or_else(|| markup::class_text(tooltip, "icon-alliance"));
    if let Some(rank_text) = rank_icon {
        item.pvp_rank = pvp_rank_from_text(&rank_text);
    }

    item.phase = Some(parse_phase(html));

    let random_enchants_html = if tooltip.contains("Random enchant") {
        enchant_section(html).map(str::to_owned)
    } else {
        None
    };

    Ok(Extracted {
        item,
        random_enchants_html,
    })
}

/// The blob arrives without surrounding braces; wrap and parse. A malformed
/// blob degrades to all-absent stats rather than failing the item.
fn parse_equip_blob(id: u32, blob: &str) -> EquipBlob {
    if blob.trim().is_empty() {
        return EquipBlob::default();
    }
    match serde_json::from_str(&format!("{{ {blob} }}")) {
        Ok(equip) => equip,
        Err(err) => {
            warn!(id, %err, "unparseable equip blob");
            EquipBlob::default()
        }
    }
}

/// The random-enchantment listing lives in a dedicated annotated container
/// in newer documents; older ones fall back to the first list element.
fn enchant_section(html: &str) -> Option<&str> {
    markup::class_block(html, "random-enchantments")
        .filter(|s| !s.trim().is_empty())
        .or_else(|| markup::first_block(html, "ul"))
}

/// Content phase from the rendering script block: the digit one position
/// past the fixed marker, defaulting to 1 when absent. The fixed-offset read
/// is inherited from the source format.
fn parse_phase(html: &str) -> i32 {
    const MARKER: &str = "Added in content phase";
    let phase = html
        .find("WH.markup.printHtml")
        .map(|n| &html[n..])
        .and_then(|script| {
            script
                .find(MARKER)
                .and_then(|n| script.get(n + MARKER.len() + 1..))
        })
        .and_then(|after| after.chars().next())
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0);
    if phase == 0 {
        1
    } else {
        phase as i32
    }
}

fn zeroless(value: Option<i32>) -> Option<i32> {
    value.filter(|&v| v != 0)
}

fn zeroless_f(value: Option<f64>) -> Option<f64> {
    value.filter(|&v| v != 0.0)
}

fn attr_number(xml: &str, tag: &str) -> Option<i32> {
    markup::tag_attr(xml, tag, "id")
        .and_then(|v| v.parse().ok())
        .filter(|&v| v != 0)
}
