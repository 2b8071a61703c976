//! Free-Text Character Import
//!
//! Reads the plain-text character sheets DCC generators print. Two sheet
//! layouts exist and each has its own entry point:
//!
//! ```text
//! 0-level Occupation: Gongfarmer
//! Strength: 10 (0)
//! ...
//! AC: 10; HP: 3
//! Weapon: Trowel (as club) -1 (dmg 1d4-1)
//! ```
//!
//! ```text
//! Neutral Thief (2nd level)
//! Strength: 10 (0)
//! ...
//! Thief Skills:
//! Backstab: 3
//! Sneak Silently: 5 (+2)
//! ```
//!
//! Fields come from `Label: value` pairs; a line may carry several pairs
//! separated by semicolons. A labelled value that does not read as expected
//! becomes a null field rather than aborting the sheet.

use once_cell::sync::Lazy;
use regex::Regex;

use super::rules::{
    alignment_code, apply_save, class_hit_dice, parse_armor_data, parse_starting_funds,
    parse_weapon_string, ABILITIES, DEFAULT_ABILITY_SCORE, SAVES,
};
use super::PcParseOptions;
use crate::ingestion::ttrpg::models::{
    EquipmentItem, FieldValue, ParsedCharacter, ParsedItem, SpellItem, UNNAMED,
};
use crate::ingestion::ttrpg::text_utils::{camel_case, ensure_signed, split_top_level};

/// Crit profile every 0-level character rolls on.
const ZERO_LEVEL_CRIT: (&str, &str) = ("1d4", "I");

// ============================================================================
// Patterns
// ============================================================================

/// `0-level Occupation: Gongfarmer`
pub(super) static ZERO_LEVEL_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*0-level Occupation:[ \t]*(?P<occupation>.+?)[ \t]*$")
        .expect("Failed to compile zero-level header regex")
});

/// `Neutral Thief (2nd level)`
pub(super) static UPPER_LEVEL_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?P<alignment>Lawful|Neutral|Chaotic)[ \t]+(?P<class>.+?)[ \t]*\([ \t]*(?P<level>\d+)(?:st|nd|rd|th)[ \t]+level[ \t]*\)[ \t]*$",
    )
    .expect("Failed to compile upper-level header regex")
});

/// Any ability label at the start of a line.
pub(super) static ABILITY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*(?:Strength|Agility|Stamina|Personality|Intelligence|Luck)[ \t]*:")
        .expect("Failed to compile ability line regex")
});

/// `10 (0)`, `16 (+2)`.
static ABILITY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<score>\d+)\s*(?:\(\s*(?P<modifier>[+\-]?\d+)\s*\))?\s*$")
        .expect("Failed to compile ability value regex")
});

/// First integer, optionally parenthesized: `(13)`, `10`.
static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?\s*(?P<v>[+\-]?\d+)\s*\)?").expect("Failed to compile number regex")
});

static THIEF_SKILL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<label>[A-Za-z][A-Za-z ,'\-]*?)\s*:\s*(?P<value>[^()]*?)\s*(?:\((?P<modifier>[^)]*)\))?\s*$")
        .expect("Failed to compile thief skill regex")
});

static SPELL_CHECK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Spell\s*Check\s*:\s*(?P<v>[^)]+)").expect("Failed to compile spell check regex")
});

static NUMBERED_SPELL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<level>\d+)\)\s*(?P<name>.+?)\s*$").expect("Failed to compile spell line regex")
});

// ============================================================================
// Labels
// ============================================================================

/// `Label: value` pairs of one sheet, in source order.
struct Labels<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> Labels<'a> {
    fn collect(text: &'a str) -> Self {
        let pairs = text
            .lines()
            .flat_map(|line| split_top_level(line, ";"))
            .filter_map(|piece| {
                let (label, value) = piece.split_once(':')?;
                let label = label.trim();
                (!label.is_empty()).then_some((label, value.trim()))
            })
            .collect();
        Self { pairs }
    }

    /// First value under `label`, compared case-insensitively.
    fn get(&self, label: &str) -> Option<&'a str> {
        self.pairs
            .iter()
            .find(|(l, _)| l.eq_ignore_ascii_case(label))
            .map(|(_, v)| *v)
            .filter(|v| !v.is_empty())
    }

    /// Every value whose lowercased label satisfies `matches`, in order.
    fn all(&self, matches: impl Fn(&str) -> bool) -> Vec<&'a str> {
        self.pairs
            .iter()
            .filter(|(l, _)| matches(&l.to_ascii_lowercase()))
            .map(|(_, v)| *v)
            .collect()
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Parse a 0-level sheet. `text` may start with the occupation header.
pub fn parse_zero_level(text: &str, options: &PcParseOptions) -> ParsedCharacter {
    let labels = Labels::collect(text);
    let occupation = ZERO_LEVEL_HEADER
        .captures(text)
        .map(|caps| caps["occupation"].to_string())
        .or_else(|| labels.get("Occupation").map(str::to_string));

    let name = labels
        .get("Name")
        .map(str::to_string)
        .or_else(|| occupation.clone())
        .unwrap_or_else(|| UNNAMED.to_string());
    let mut pc = ParsedCharacter::new(name);

    if let Some(occupation) = occupation {
        pc.set("details.occupation.value", occupation);
    }
    pc.set("details.level.value", "0");
    if let Some(alignment) = labels.get("Alignment").and_then(alignment_code) {
        pc.set("details.alignment", alignment);
    }

    apply_common(&mut pc, &labels);
    pc.set(
        "attributes.hitDice.value",
        labels.get("Hit Dice").unwrap_or(options.default_hit_dice.as_str()),
    );
    apply_combat(&mut pc, &labels, Some(ZERO_LEVEL_CRIT));
    apply_items(&mut pc, &labels);

    log::debug!("0-level pc '{}': {} field(s)", pc.name(), pc.fields().len());
    pc
}

/// Parse a leveled sheet starting with an `<Alignment> <Class> (<n>th level)`
/// header.
pub fn parse_upper_level(text: &str, options: &PcParseOptions) -> ParsedCharacter {
    let labels = Labels::collect(text);
    let header = UPPER_LEVEL_HEADER.captures(text);
    let class_name = header.as_ref().map(|caps| caps["class"].trim().to_string());
    let level: Option<i64> = header.as_ref().and_then(|caps| caps["level"].parse().ok());

    let name = labels
        .get("Name")
        .map(str::to_string)
        .or_else(|| class_name.clone())
        .unwrap_or_else(|| UNNAMED.to_string());
    let mut pc = ParsedCharacter::new(name);

    if let Some(caps) = &header {
        if let Some(alignment) = alignment_code(&caps["alignment"]) {
            pc.set("details.alignment", alignment);
        }
    }
    if let Some(class_name) = &class_name {
        pc.set("class.className", class_name.as_str());
    }
    if let Some(level) = level {
        pc.set("details.level.value", level.to_string());
    }
    if let Some(occupation) = labels.get("Occupation") {
        pc.set("details.occupation.value", occupation);
    }

    apply_common(&mut pc, &labels);
    let hit_dice = labels.get("Hit Dice").map(str::to_string).unwrap_or_else(|| {
        class_hit_dice(class_name.as_deref(), level, &options.default_hit_dice)
    });
    pc.set("attributes.hitDice.value", hit_dice);
    apply_combat(&mut pc, &labels, None);

    if let Some(bonus) = labels.get("Base Attack Mod") {
        pc.set("details.attackBonus", ensure_signed(bonus));
    }

    apply_thief_skills(&mut pc, text);
    apply_spells(&mut pc, text);
    apply_items(&mut pc, &labels);

    log::debug!(
        "level {} pc '{}': {} field(s), {} item(s)",
        level.unwrap_or_default(),
        pc.name(),
        pc.fields().len(),
        pc.items().len()
    );
    pc
}

// ============================================================================
// Shared Sections
// ============================================================================

/// Abilities, defenses, movement and saves.
fn apply_common(pc: &mut ParsedCharacter, labels: &Labels<'_>) {
    for (ability, _, label) in ABILITIES {
        let value = match labels.get(label) {
            Some(raw) => match ABILITY_VALUE.captures(raw) {
                Some(caps) => FieldValue::Text(caps["score"].to_string()),
                None => {
                    log::debug!("unreadable {} value '{}'", label, raw);
                    FieldValue::Null
                }
            },
            None => FieldValue::Text(DEFAULT_ABILITY_SCORE.to_string()),
        };
        pc.set(&format!("abilities.{}.value", ability), value);
    }

    match labels.get("AC") {
        Some(raw) => {
            let (ac, armor) = split_armor_class(raw);
            pc.set("attributes.ac.value", ac);
            if let Some(armor) = armor.and_then(parse_armor_data) {
                pc.push_item(ParsedItem::Armor(armor));
            }
        }
        None => pc.set("attributes.ac.value", "10"),
    }

    let hp = labels.get("HP").map(|raw| number_or_null(raw)).unwrap_or(FieldValue::Null);
    pc.set("attributes.hp.value", hp.clone());
    pc.set("attributes.hp.max", hp);

    pc.set("attributes.speed.value", labels.get("Speed").unwrap_or("30"));
    pc.set(
        "attributes.init.value",
        labels.get("Init").map(ensure_signed).unwrap_or_else(|| "+0".to_string()),
    );

    let save_labels = ["Ref", "Fort", "Will"];
    for ((save, ability), label) in SAVES.iter().zip(save_labels) {
        apply_save(pc, save, ability, labels.get(label));
    }

    if let Some(sign) = labels.get("Lucky sign") {
        pc.set("details.luckySign.value", sign);
    }
    if let Some(languages) = labels.get("Languages") {
        pc.set("details.languages.value", languages);
    }
}

/// Action dice and crit profile, with `default_crit` when the sheet has no
/// `Crit Die/Table` line.
fn apply_combat(pc: &mut ParsedCharacter, labels: &Labels<'_>, default_crit: Option<(&str, &str)>) {
    pc.set(
        "attributes.actionDice.value",
        labels.get("Attack Dice").or_else(|| labels.get("Action Dice")).unwrap_or("1d20"),
    );

    let crit = labels
        .get("Crit Die/Table")
        .and_then(|raw| raw.split_once('/'))
        .map(|(die, table)| (die.trim(), table.trim()))
        .or(default_crit);
    if let Some((die, table)) = crit {
        pc.set("attributes.critical.die", die);
        pc.set("attributes.critical.table", table);
    }
}

/// Weapons, equipment, then funds, in sheet order within each group.
fn apply_items(pc: &mut ParsedCharacter, labels: &Labels<'_>) {
    let weapons = labels.all(|label| label.ends_with("weapon"));
    for weapon in weapons.into_iter().filter_map(parse_weapon_string) {
        pc.push_item(ParsedItem::Weapon(weapon));
    }

    let equipment = labels.all(|label| label == "equipment" || label == "trade good");
    for name in equipment.into_iter().filter(|name| !name.is_empty()) {
        pc.push_item(ParsedItem::Equipment(EquipmentItem {
            name: name.to_string(),
        }));
    }

    if let Some(funds) = labels.get("Starting Funds") {
        pc.push_item(ParsedItem::Currency(parse_starting_funds(funds)));
    }
}

/// `(16) (Chainmail (+5) Check penalty (-5) Fumble die (d12))` -> AC and
/// the armor description.
fn split_armor_class(raw: &str) -> (FieldValue, Option<&str>) {
    let Some(caps) = LEADING_NUMBER.captures(raw) else {
        return (FieldValue::Null, None);
    };
    let ac = FieldValue::Text(caps["v"].trim_start_matches('+').to_string());

    let rest = raw[caps.get(0).map(|m| m.end()).unwrap_or(0)..].trim();
    let armor = rest
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(rest)
        .trim();
    (ac, (!armor.is_empty()).then_some(armor))
}

fn number_or_null(raw: &str) -> FieldValue {
    LEADING_NUMBER
        .captures(raw)
        .map(|caps| FieldValue::Text(caps["v"].to_string()))
        .unwrap_or(FieldValue::Null)
}

// ============================================================================
// Class Blocks
// ============================================================================

/// Lines following the first line that starts with `header`, up to a blank
/// line.
fn block_after<'a>(text: &'a str, header: &str) -> Option<(&'a str, Vec<&'a str>)> {
    let mut lines = text.lines();
    let header_line = lines.find(|line| {
        line.trim_start()
            .get(..header.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(header))
    })?;
    let body = lines.take_while(|line| !line.trim().is_empty()).collect();
    Some((header_line, body))
}

/// `Thief Skills:` block -> `skills.<camelCase>.value`.
fn apply_thief_skills(pc: &mut ParsedCharacter, text: &str) {
    let Some((_, lines)) = block_after(text, "Thief Skills:") else {
        return;
    };

    for line in lines {
        let Some((label, _)) = line.split_once(':') else {
            break;
        };
        let key = camel_case(label);
        if key.is_empty() || key == "spells" {
            break;
        }

        let value = THIEF_SKILL_LINE
            .captures(line)
            .map(|caps| caps["value"].trim().to_string())
            .filter(|value| !value.is_empty())
            .map(FieldValue::Text)
            .unwrap_or(FieldValue::Null);
        pc.set(&format!("skills.{}.value", key), value);
    }
}

/// `Spells: (Spell Check: d20+2)` then `<level>) <name>` lines.
fn apply_spells(pc: &mut ParsedCharacter, text: &str) {
    let Some((header, lines)) = block_after(text, "Spells:") else {
        return;
    };

    if let Some(caps) = SPELL_CHECK.captures(header) {
        let check: String = caps["v"].chars().filter(|c| !c.is_whitespace()).collect();
        pc.set("class.spellCheck", check);
    }

    for line in lines {
        let Some(caps) = NUMBERED_SPELL_LINE.captures(line) else {
            break;
        };
        pc.push_item(ParsedItem::Spell(SpellItem {
            name: caps["name"].to_string(),
            level: caps["level"].parse().unwrap_or(1),
        }));
    }
}
