//! DCC Character Rules
//!
//! Rule tables and string decoders shared by the JSON and free-text PC
//! importers: ability modifiers, class hit dice, and the weapon, armor and
//! starting-funds strings character generators emit.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ingestion::ttrpg::models::{
    leading_int, ArmorItem, CurrencyItem, Denomination, FieldValue, ParsedCharacter, WeaponItem,
};
use crate::ingestion::ttrpg::text_utils::{ensure_signed, fuzzy_key};

/// Placeholder the document model resolves to the deed die at roll time.
pub const DEED_PLACEHOLDER: &str = "@ab";

// ============================================================================
// Abilities
// ============================================================================

/// Ability keys in sheet order with their JSON export names and text labels.
pub const ABILITIES: [(&str, &str, &str); 6] = [
    ("str", "strengthScore", "Strength"),
    ("agl", "agilityScore", "Agility"),
    ("sta", "staminaScore", "Stamina"),
    ("per", "personalityScore", "Personality"),
    ("int", "intelligenceScore", "Intelligence"),
    ("lck", "luckScore", "Luck"),
];

pub const DEFAULT_ABILITY_SCORE: i64 = 10;

/// Saves with the ability that modifies each.
pub const SAVES: [(&str, &str); 3] = [("ref", "agl"), ("frt", "sta"), ("wil", "per")];

/// DCC ability score modifier.
pub fn ability_modifier(score: i64) -> i64 {
    match score {
        i64::MIN..=3 => -3,
        4..=5 => -2,
        6..=8 => -1,
        9..=12 => 0,
        13..=15 => 1,
        16..=17 => 2,
        _ => 3,
    }
}

/// Write `saves.<key>.value` and the class bonus left after removing the
/// ability modifier. Expects abilities to be set already.
pub fn apply_save(pc: &mut ParsedCharacter, save: &str, ability: &str, raw: Option<&str>) {
    let value = raw.map(ensure_signed).unwrap_or_else(|| "+0".to_string());
    let score = pc
        .field(&format!("abilities.{}.value", ability))
        .and_then(FieldValue::as_i64)
        .unwrap_or(DEFAULT_ABILITY_SCORE);
    let bonus = leading_int(&value).unwrap_or(0) - ability_modifier(score);

    pc.set(&format!("saves.{}.classBonus", save), format!("{:+}", bonus));
    pc.set(&format!("saves.{}.value", save), value);
}

// ============================================================================
// Classes
// ============================================================================

/// Hit die faces per class.
const CLASS_HIT_DIE: [(&str, u32); 7] = [
    ("warrior", 12),
    ("wizard", 4),
    ("cleric", 8),
    ("thief", 6),
    ("dwarf", 10),
    ("elf", 6),
    ("halfling", 6),
];

/// Hit die faces for a class name, matched loosely.
pub fn class_hit_die(class_name: &str) -> Option<u32> {
    let key = fuzzy_key(CLASS_HIT_DIE.iter().map(|(name, _)| *name), class_name)?;
    CLASS_HIT_DIE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, faces)| *faces)
}

/// `<level>d<class die>`, or `default` when the class is unknown.
pub fn class_hit_dice(class_name: Option<&str>, level: Option<i64>, default: &str) -> String {
    match class_name.and_then(class_hit_die) {
        Some(faces) => format!("{}d{}", level.filter(|l| *l > 0).unwrap_or(1), faces),
        None => default.to_string(),
    }
}

/// `Lawful` -> `l`. Anything unrecognized is `None`.
pub fn alignment_code(text: &str) -> Option<String> {
    match text.trim().chars().next()?.to_ascii_lowercase() {
        c @ ('l' | 'n' | 'c') => Some(c.to_string()),
        _ => None,
    }
}

// ============================================================================
// Weapons
// ============================================================================

/// To-hit token after the name: `+1`, `-1`, `d3+1`, `deed+1`.
static WEAPON_TO_HIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|\s)(?P<hit>[+\-]\s*\d+|d\d+(?:[+\-]\d+)?|deed(?:[+\-]\d+)?)(?:\s|$)")
        .expect("Failed to compile weapon to-hit regex")
});

/// Damage parenthetical: `(1d6+1)`, `(dmg 1d4-1)`, `(1d8+deed)`.
static WEAPON_DAMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\((?:dmg\s*)?(?P<damage>[^()]*?(?:\d*d\d+|deed)[^()]*)\)")
        .expect("Failed to compile weapon damage regex")
});

static WEAPON_MODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?P<mode>melee|ranged|missile)\b").expect("Failed to compile weapon mode regex")
});

static MISSILE_WEAPON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:slings?|(?:short|long)?bows?|crossbows?|darts?|blowguns?)\b")
        .expect("Failed to compile missile weapon regex")
});

static DEED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)deed").expect("Failed to compile deed regex"));

/// Decode a generator weapon line such as `Short sword +1 melee (1d6+1)` or
/// `Trowel (as club) -1 (dmg 1d4-1)`.
///
/// Returns `None` only for blank input.
pub fn parse_weapon_string(text: &str) -> Option<WeaponItem> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let damage_match = WEAPON_DAMAGE.captures_iter(text).last();
    let damage = damage_match
        .as_ref()
        .map(|caps| {
            let raw: String = caps["damage"].chars().filter(|c| !c.is_whitespace()).collect();
            DEED.replace_all(&raw, DEED_PLACEHOLDER).into_owned()
        })
        .unwrap_or_else(|| "0".to_string());
    let head_end = damage_match
        .as_ref()
        .and_then(|caps| caps.get(0))
        .map(|m| m.start())
        .unwrap_or(text.len());
    let head = &text[..head_end];

    let to_hit_match = WEAPON_TO_HIT.captures(head);
    let to_hit = to_hit_match
        .as_ref()
        .map(|caps| {
            let hit: String = caps["hit"].chars().filter(|c| !c.is_whitespace()).collect();
            ensure_signed(&hit)
        })
        .unwrap_or_else(|| "+0".to_string());

    let name_end = to_hit_match
        .as_ref()
        .and_then(|caps| caps.get(0))
        .map(|m| m.start())
        .or_else(|| WEAPON_MODE.find(head).map(|m| m.start()))
        .unwrap_or(head.len());
    let name = head[..name_end].trim();
    let name = if name.is_empty() { text } else { name };

    Some(WeaponItem {
        name: name.to_string(),
        to_hit,
        damage,
        melee: is_melee(head, name),
        description: String::new(),
    })
}

/// An explicit `melee`/`ranged` keyword wins; otherwise known missile
/// weapons are ranged.
fn is_melee(text: &str, name: &str) -> bool {
    match WEAPON_MODE.captures(text) {
        Some(caps) => caps["mode"].eq_ignore_ascii_case("melee"),
        None => !MISSILE_WEAPON.is_match(name),
    }
}

// ============================================================================
// Armor
// ============================================================================

static ARMOR_AC_BONUS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(\s*(?P<v>[+\-]\s*\d+)\s*\)").expect("Failed to compile armor bonus regex")
});

static ARMOR_CHECK_PENALTY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)check\s*penalty\s*\(?\s*(?P<v>[+\-]?\s*\d+)")
        .expect("Failed to compile check penalty regex")
});

static ARMOR_FUMBLE_DIE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)fumble\s*die\s*\(?\s*(?P<v>\d*d\d+)").expect("Failed to compile fumble die regex")
});

/// Decode `Chainmail (+5) Check penalty (-5) Fumble die (d12)`.
pub fn parse_armor_data(text: &str) -> Option<ArmorItem> {
    let text = text.trim();
    let name = text.split('(').next().unwrap_or_default().trim();
    if name.is_empty() {
        return None;
    }

    let grab = |pattern: &Regex| {
        pattern
            .captures(text)
            .map(|caps| caps["v"].chars().filter(|c| !c.is_whitespace()).collect::<String>())
    };

    Some(ArmorItem {
        name: name.to_string(),
        ac_bonus: grab(&ARMOR_AC_BONUS).unwrap_or_else(|| "+0".to_string()),
        check_penalty: grab(&ARMOR_CHECK_PENALTY).unwrap_or_else(|| "0".to_string()),
        fumble_die: grab(&ARMOR_FUMBLE_DIE).unwrap_or_else(|| "d4".to_string()),
    })
}

// ============================================================================
// Currency
// ============================================================================

static DENOMINATION_PATTERNS: Lazy<Vec<(Denomination, Regex)>> = Lazy::new(|| {
    Denomination::ALL
        .iter()
        .map(|&denomination| {
            let pattern = format!(r"(?i)(?P<amount>\d+)\s*{}\b", denomination.code());
            let regex = Regex::new(&pattern).expect("Failed to compile denomination regex");
            (denomination, regex)
        })
        .collect()
});

/// Decode `33 cp + 2 sp`. Every denomination is present; missing ones are
/// `"0"`.
pub fn parse_starting_funds(text: &str) -> CurrencyItem {
    let denominations: BTreeMap<Denomination, String> = DENOMINATION_PATTERNS
        .iter()
        .map(|(denomination, pattern)| {
            let amount = pattern
                .captures(text)
                .map(|caps| caps["amount"].to_string())
                .unwrap_or_else(|| "0".to_string());
            (*denomination, amount)
        })
        .collect();
    CurrencyItem { denominations }
}
