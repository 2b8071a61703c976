//! JSON Character Import
//!
//! Maps character-generator JSON exports onto record fields. The export
//! schema is loose: every key is optional, ability scores may be strings or
//! numbers, and list-valued keys sometimes arrive as plain strings. Values
//! are read key by key with a default for each, and scalar values are passed
//! through with their original JSON type.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::rules::{
    alignment_code, apply_save, class_hit_dice, parse_armor_data, parse_starting_funds,
    parse_weapon_string, ABILITIES, DEED_PLACEHOLDER, DEFAULT_ABILITY_SCORE, SAVES,
};
use super::PcParseOptions;
use crate::ingestion::ttrpg::models::{
    EquipmentItem, FieldValue, ParsedCharacter, ParsedItem, SpellItem, WeaponItem, UNNAMED,
};
use crate::ingestion::ttrpg::text_utils::ensure_signed;

/// `"key": value` pairs, for salvaging malformed exports.
static KEY_VALUE_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
        "(?P<key>[A-Za-z0-9_]+)"
        \s*:\s*
        (?P<value>
            "(?:[^"\\]|\\.)*"
            |
            -?\d+(?:\.\d+)?
            |
            true|false|null
        )
        "#,
    )
    .expect("Failed to compile key/value regex")
});

/// Numbered spell entry: `1) Magic Missile`.
static NUMBERED_SPELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<level>\d+)\)\s*(?P<name>.+?)\s*$").expect("Failed to compile spell regex")
});

const EQUIPMENT_KEYS: [&str; 4] = ["equipment", "equipment2", "equipment3", "tradeGood"];

// ============================================================================
// Entry Points
// ============================================================================

/// Expand a parsed document into character objects: a `characters` array,
/// a top-level array, or a single object.
pub fn character_objects(document: &Value) -> Vec<&Map<String, Value>> {
    match document {
        Value::Object(object) => match object.get("characters") {
            Some(Value::Array(characters)) => characters.iter().flat_map(character_objects).collect(),
            _ => vec![object],
        },
        Value::Array(items) => items.iter().flat_map(character_objects).collect(),
        _ => Vec::new(),
    }
}

/// Recover what can be read from a document that failed to parse.
///
/// Collects every `"key": scalar` pair into one object; later duplicates
/// win. Returns `None` when nothing was recoverable.
pub fn salvage(text: &str) -> Option<Value> {
    let mut object = Map::new();
    for caps in KEY_VALUE_PAIR.captures_iter(text) {
        let raw = &caps["value"];
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        object.insert(caps["key"].to_string(), value);
    }

    if object.is_empty() {
        None
    } else {
        log::debug!("salvaged {} key(s) from malformed character JSON", object.len());
        Some(Value::Object(object))
    }
}

/// Map one character object onto a record.
pub fn parse_character(object: &Map<String, Value>, options: &PcParseOptions) -> ParsedCharacter {
    let name = ["name", "occTitle", "className"]
        .iter()
        .find_map(|key| text_value(object, key))
        .unwrap_or_else(|| UNNAMED.to_string());
    let mut pc = ParsedCharacter::new(name);

    for (ability, key, _) in ABILITIES {
        let value = scalar(object, key).unwrap_or(FieldValue::Integer(DEFAULT_ABILITY_SCORE));
        pc.set(&format!("abilities.{}.value", ability), value);
    }

    pc.set("attributes.ac.value", scalar(object, "armorClass").unwrap_or_else(|| "10".into()));
    let hp = scalar(object, "hitPoints").unwrap_or(FieldValue::Null);
    pc.set("attributes.hp.value", hp.clone());
    pc.set("attributes.hp.max", hp);

    let save_keys = [("ref", "saveReflex"), ("frt", "saveFort"), ("wil", "saveWill")];
    for ((save, ability), (_, key)) in SAVES.iter().zip(save_keys) {
        let raw = scalar(object, key).map(|v| v.to_string());
        apply_save(&mut pc, save, ability, raw.as_deref());
    }

    let class_name = text_value(object, "className");
    let level = scalar(object, "level");
    if let Some(class_name) = &class_name {
        pc.set("class.className", class_name.as_str());
    }
    if let Some(level) = &level {
        pc.set("details.level.value", level.clone());
    }
    if let Some(occupation) = text_value(object, "occTitle") {
        pc.set("details.occupation.value", occupation);
    }
    if let Some(spell_check) = scalar(object, "spellCheck") {
        pc.set("class.spellCheck", spell_check);
    }

    pc.set("attributes.actionDice.value", action_dice(object));

    let hit_dice = text_value(object, "hitDice").unwrap_or_else(|| {
        class_hit_dice(
            class_name.as_deref(),
            level.as_ref().and_then(FieldValue::as_i64),
            &options.default_hit_dice,
        )
    });
    pc.set("attributes.hitDice.value", hit_dice);

    apply_details(&mut pc, object);
    apply_items(&mut pc, object);

    log::debug!(
        "pc '{}' from JSON: {} field(s), {} item(s)",
        pc.name(),
        pc.fields().len(),
        pc.items().len()
    );
    pc
}

// ============================================================================
// Field Readers
// ============================================================================

fn scalar(object: &Map<String, Value>, key: &str) -> Option<FieldValue> {
    object.get(key).and_then(FieldValue::from_json).filter(|v| !v.is_null())
}

/// Non-empty text view of a scalar key; numbers are stringified.
fn text_value(object: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match object.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// `actionDice` as a string, or a list joined with commas.
fn action_dice(object: &Map<String, Value>) -> String {
    match object.get("actionDice") {
        Some(Value::Array(dice)) => {
            let joined = dice
                .iter()
                .filter_map(|die| match die {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .filter(|die| !die.is_empty())
                .collect::<Vec<_>>()
                .join(",");
            if joined.is_empty() {
                "1d20".to_string()
            } else {
                joined
            }
        }
        _ => text_value(object, "actionDice").unwrap_or_else(|| "1d20".to_string()),
    }
}

fn apply_details(pc: &mut ParsedCharacter, object: &Map<String, Value>) {
    if let Some(alignment) = text_value(object, "alignment").and_then(|a| alignment_code(&a)) {
        pc.set("details.alignment", alignment);
    }

    let passthrough = [
        ("luckySign", "details.luckySign.value"),
        ("languages", "details.languages.value"),
        ("speed", "attributes.speed.value"),
        ("initiative", "attributes.init.value"),
        ("attackBonus", "details.attackBonus"),
        ("critDie", "attributes.critical.die"),
        ("critTable", "attributes.critical.table"),
    ];
    for (key, path) in passthrough {
        if let Some(value) = scalar(object, key) {
            pc.set(path, value);
        }
    }
}

// ============================================================================
// Items
// ============================================================================

fn apply_items(pc: &mut ParsedCharacter, object: &Map<String, Value>) {
    if let Some(weapon) = text_value(object, "weapon").and_then(|w| parse_weapon_string(&w)) {
        pc.push_item(ParsedItem::Weapon(weapon));
    }
    if let Some(Value::Array(weapons)) = object.get("weapons") {
        for weapon in weapons.iter().filter_map(weapon_entry) {
            pc.push_item(ParsedItem::Weapon(weapon));
        }
    }

    if let Some(armor) = text_value(object, "armorData").and_then(|a| parse_armor_data(&a)) {
        pc.push_item(ParsedItem::Armor(armor));
    }

    for key in EQUIPMENT_KEYS {
        if let Some(name) = text_value(object, key) {
            pc.push_item(ParsedItem::Equipment(EquipmentItem { name }));
        }
    }

    if let Some(Value::Array(spells)) = object.get("spells") {
        for spell in spells.iter().filter_map(spell_entry) {
            pc.push_item(ParsedItem::Spell(spell));
        }
    }

    let funds = text_value(object, "startingFunds").unwrap_or_default();
    pc.push_item(ParsedItem::Currency(parse_starting_funds(&funds)));
}

/// A `weapons[]` entry: a generator string or a `{name, toHit, damage}`
/// object.
fn weapon_entry(value: &Value) -> Option<WeaponItem> {
    match value {
        Value::String(text) => parse_weapon_string(text),
        Value::Object(fields) => {
            let name = text_value(fields, "name")?;
            let mut weapon = parse_weapon_string(&name)?;
            weapon.name = name;
            if let Some(to_hit) = text_value(fields, "toHit").or_else(|| text_value(fields, "attackMod")) {
                weapon.to_hit = ensure_signed(&to_hit);
            }
            if let Some(damage) = text_value(fields, "damage") {
                weapon.damage = damage.replace("deed", DEED_PLACEHOLDER);
            }
            if let Some(Value::Bool(melee)) = fields.get("melee") {
                weapon.melee = *melee;
            }
            if let Some(description) = text_value(fields, "description") {
                weapon.description = description;
            }
            Some(weapon)
        }
        _ => None,
    }
}

/// A `spells[]` entry: `"Sleep"`, `"2) Scorch"`, or `{name, level}`.
fn spell_entry(value: &Value) -> Option<SpellItem> {
    match value {
        Value::String(text) => {
            if let Some(caps) = NUMBERED_SPELL.captures(text) {
                return Some(SpellItem {
                    name: caps["name"].to_string(),
                    level: caps["level"].parse().unwrap_or(1),
                });
            }
            let name = text.trim();
            (!name.is_empty()).then(|| SpellItem {
                name: name.to_string(),
                level: 1,
            })
        }
        Value::Object(fields) => Some(SpellItem {
            name: text_value(fields, "name")?,
            level: fields
                .get("level")
                .and_then(FieldValue::from_json)
                .and_then(|level| level.as_i64())
                .and_then(|level| u32::try_from(level).ok())
                .unwrap_or(1),
        }),
        _ => None,
    }
}
