//! NPC Stat Block Parsing Module
//!
//! Parses DCC-style monster stat blocks into flat field maps plus weapon
//! items. A block is one paragraph of semicolon-separated fields:
//!
//! ```text
//! Cute-Infused Orcs (3): Init +2; Atk claw +1 melee (1d4) or spear +1 melee (1d8);
//! AC 15; HD 2d8+2; hp 13 each; MV 30'; Act 1d20; SP none;
//! SV Fort +3, Ref +0, Will -1; AL C.
//! ```
//!
//! Blocks are separated by blank lines. Every field is optional and falls
//! back to a default, so any non-blank block yields exactly one record.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::crit::{self, HitDiceProfile};
use super::models::{ParsedCharacter, ParsedItem, WeaponItem, UNNAMED};
use super::text_utils::{
    ensure_signed, first_dice_term, first_signed_modifier, normalize_whitespace, split_top_level,
    take_until_top_level,
};
use crate::config::ImportConfig;
use crate::core::dice::{AverageEvaluator, DiceEvaluator};

// ============================================================================
// Defaults
// ============================================================================

const DEFAULT_INIT: &str = "+0";
const DEFAULT_AC: &str = "10";
const DEFAULT_SPEED: &str = "30";
const DEFAULT_ACTION_DICE: &str = "1d20";
const DEFAULT_SAVE: &str = "+0";
const DEFAULT_ALIGNMENT: &str = "n";

// ============================================================================
// Patterns
// ============================================================================

/// A blank line (possibly holding spaces or tabs) between blocks.
static BLOCK_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("Failed to compile block separator regex"));

/// Trailing quantity such as `(5)`, `(1d6)` or `(2-4)`.
static QUANTITY_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\(\s*(?:\d+\s*(?:-\s*\d+)?|\d*[dD]\d+(?:[+\-]\d+)?)\s*\)\s*$")
        .expect("Failed to compile quantity regex")
});

static INIT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bInit\s*(?P<v>[^;]+)").expect("Failed to compile init regex"));

static ATK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bAtk\s*(?P<v>[^;]+)").expect("Failed to compile attack regex"));

static AC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bAC\s*(?P<v>\d+)").expect("Failed to compile AC regex"));

static HD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bHD\s*(?P<v>[^;]+)").expect("Failed to compile HD regex"));

static HP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bhp\s*(?P<v>\d+)").expect("Failed to compile hp regex"));

static MV_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bMV\s*(?P<v>[^;]+)").expect("Failed to compile MV regex"));

static ACT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bAct\b\s*(?P<v>[^;]+)").expect("Failed to compile Act regex"));

static SP_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bSP\b\s*").expect("Failed to compile SP regex"));

static FORT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bFort\s*(?P<v>[+\-−–]?\s*\d+)").expect("Failed to compile Fort regex")
});

static REF_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bRef\s*(?P<v>[+\-−–]?\s*\d+)").expect("Failed to compile Ref regex")
});

static WILL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bWill\s*(?P<v>[+\-−–]?\s*\d+)").expect("Failed to compile Will regex")
});

static AL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bAL\s*(?P<v>[LNClnc])\b").expect("Failed to compile AL regex"));

/// `½d8`, `1/2 d8`, `¼d4+1`.
static FRACTIONAL_HD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^(?P<frac>½|⅓|¼|1/2|1/3|1/4)
        \s*[dD](?P<faces>\d+)
        (?P<modifier>\s*[+\-]\s*\d+)?
        ",
    )
    .expect("Failed to compile fractional HD regex")
});

/// `2d8+2`, `3d6+1d4`, `d8`.
static DICE_HD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d*[dD]\d+(?:\s*[+\-]\s*(?:\d*[dD]\d+|\d+))*")
        .expect("Failed to compile HD dice regex")
});

/// Bare hit-dice count: `HD 3`.
static BARE_HD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<count>\d+)\b").expect("Failed to compile bare HD regex"));

static DIE_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<count>\d*)[dD](?P<faces>\d+)").expect("Failed to compile die parts regex")
});

/// To-hit bonus ending an attack name: `short-sword +1`.
static TO_HIT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+\-−–]\s*\d").expect("Failed to compile to-hit regex"));

static ATTACK_MODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?P<mode>melee|ranged|missile(?:\s+fire)?)\b")
        .expect("Failed to compile attack mode regex")
});

/// Leading damage inside an attack's parenthetical, after an optional `dmg`.
static LEADING_DAMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        ^(?:dmg\s+)?
        (?P<damage>
            \d*d\d+(?:\s*[+\-]\s*(?:\d*d\d+|\d+)\b)*
            |
            \d+\b
        )
        ",
    )
    .expect("Failed to compile damage regex")
});

// ============================================================================
// Options
// ============================================================================

/// Knobs for NPC parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcParseOptions {
    /// Hit dice assumed when a block has no `HD` field.
    pub default_hit_dice: String,
    /// Cut `SP` text at the first top-level semicolon rather than the first
    /// semicolon.
    pub paren_aware_special: bool,
}

impl Default for NpcParseOptions {
    fn default() -> Self {
        Self {
            default_hit_dice: "1d8".to_string(),
            paren_aware_special: false,
        }
    }
}

impl From<&ImportConfig> for NpcParseOptions {
    fn from(config: &ImportConfig) -> Self {
        Self {
            default_hit_dice: config.npc_default_hit_dice.clone(),
            paren_aware_special: config.paren_aware_special,
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Normalized hit dice for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HitDice {
    formula: String,
    profile: HitDiceProfile,
}

/// Parses NPC stat blocks.
#[derive(Clone)]
pub struct NpcParser {
    options: NpcParseOptions,
    evaluator: Arc<dyn DiceEvaluator>,
}

impl std::fmt::Debug for NpcParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NpcParser").field("options", &self.options).finish_non_exhaustive()
    }
}

impl Default for NpcParser {
    fn default() -> Self {
        Self::new()
    }
}

impl NpcParser {
    /// Parser with default options; missing hit points use the average roll.
    pub fn new() -> Self {
        Self::with_options(NpcParseOptions::default())
    }

    pub fn with_options(options: NpcParseOptions) -> Self {
        Self {
            options,
            evaluator: Arc::new(AverageEvaluator),
        }
    }

    /// Use `evaluator` for values that must be rolled, such as missing hp.
    pub fn with_evaluator(mut self, evaluator: Arc<dyn DiceEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Parse every block in `text`. Blank input yields no records.
    pub fn parse(&self, text: &str) -> Vec<ParsedCharacter> {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let blocks: Vec<&str> = BLOCK_SEPARATOR
            .split(&normalized)
            .filter(|block| !block.trim().is_empty())
            .collect();

        log::debug!("npc import: {} block(s)", blocks.len());
        blocks.into_iter().map(|block| self.parse_block(block)).collect()
    }

    /// Parse a single block. Always returns a record.
    pub fn parse_block(&self, raw: &str) -> ParsedCharacter {
        let text = normalize_whitespace(raw);
        let (name, body) = split_name(&text);
        let mut npc = ParsedCharacter::new(name);

        npc.set("attributes.init.value", init_value(body));
        npc.set("attributes.ac.value", capture(&AC_PATTERN, body).unwrap_or(DEFAULT_AC));

        let hit_dice = self.hit_dice(body);
        let hp = match capture(&HP_PATTERN, body) {
            Some(hp) => hp.to_string(),
            None => self.roll_hp(&hit_dice.formula),
        };
        npc.set("attributes.hitDice.value", hit_dice.formula.as_str());
        npc.set("attributes.hp.value", hp.as_str());
        npc.set("attributes.hp.max", hp);

        let (speed, other_speed) = speed_values(body);
        npc.set("attributes.speed.value", speed);
        npc.set("attributes.speed.other", other_speed);

        npc.set(
            "attributes.actionDice.value",
            capture(&ACT_PATTERN, body).map(trim_field).unwrap_or(DEFAULT_ACTION_DICE),
        );

        let special = self.special_value(body);
        npc.set("attributes.special.value", special.as_str());

        let critical = crit::parse_explicit(body)
            .unwrap_or_else(|| crit::infer(npc.name(), &special, &hit_dice.profile));
        npc.set("attributes.critical.die", critical.die);
        npc.set("attributes.critical.table", critical.table);
        npc.set("attributes.critical.range", critical.range);

        npc.set("saves.frt.value", save_value(&FORT_PATTERN, body));
        npc.set("saves.ref.value", save_value(&REF_PATTERN, body));
        npc.set("saves.wil.value", save_value(&WILL_PATTERN, body));

        npc.set(
            "details.alignment",
            capture(&AL_PATTERN, body)
                .map(str::to_lowercase)
                .unwrap_or_else(|| DEFAULT_ALIGNMENT.to_string()),
        );
        npc.set("details.notes.value", raw);

        if let Some(attacks) = capture(&ATK_PATTERN, body) {
            for weapon in parse_attacks(trim_field(attacks)) {
                npc.push_item(ParsedItem::Weapon(weapon));
            }
        }

        log::debug!(
            "npc '{}': {} field(s), {} weapon(s)",
            npc.name(),
            npc.fields().len(),
            npc.items().len()
        );
        npc
    }

    fn hit_dice(&self, body: &str) -> HitDice {
        match capture(&HD_PATTERN, body) {
            Some(value) => normalize_hit_dice(value, &self.options.default_hit_dice),
            None => {
                let mut hd = normalize_hit_dice(&self.options.default_hit_dice, "1d8");
                hd.profile.explicit = false;
                hd
            }
        }
    }

    fn roll_hp(&self, formula: &str) -> String {
        self.evaluator
            .evaluate(formula)
            .map(|hp| hp.max(1))
            .unwrap_or(1)
            .to_string()
    }

    fn special_value(&self, body: &str) -> String {
        let Some(label) = SP_LABEL.find(body) else {
            return String::new();
        };
        let rest = &body[label.end()..];
        let value = if self.options.paren_aware_special {
            take_until_top_level(rest, ';')
        } else {
            rest.split(';').next().unwrap_or_default()
        };
        trim_field(value).to_string()
    }
}

// ============================================================================
// Field Helpers
// ============================================================================

fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.name("v"))
        .map(|m| m.as_str())
}

/// Trim spaces and a trailing period that ends the block.
fn trim_field(value: &str) -> &str {
    value.trim().trim_end_matches('.').trim_end()
}

/// Name is the text before the first colon, minus a quantity suffix.
fn split_name(text: &str) -> (String, &str) {
    let Some(idx) = text.find(':') else {
        return (UNNAMED.to_string(), text);
    };
    let prefix = text[..idx].trim();
    if prefix.is_empty() || prefix.contains(';') {
        return (UNNAMED.to_string(), text);
    }

    let name = QUANTITY_SUFFIX.replace(prefix, "");
    let name = name.trim();
    let name = if name.is_empty() { UNNAMED } else { name };
    (name.to_string(), &text[idx + 1..])
}

fn init_value(body: &str) -> String {
    match capture(&INIT_PATTERN, body).map(trim_field) {
        Some(value) if !value.is_empty() => ensure_signed(value),
        _ => DEFAULT_INIT.to_string(),
    }
}

fn save_value(pattern: &Regex, body: &str) -> String {
    match capture(pattern, body) {
        Some(value) => {
            let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
            ensure_signed(&compact)
        }
        None => DEFAULT_SAVE.to_string(),
    }
}

/// Primary speed and the rest, split on the first `or` only.
fn speed_values(body: &str) -> (String, String) {
    let Some(value) = capture(&MV_PATTERN, body).map(trim_field) else {
        return (DEFAULT_SPEED.to_string(), String::new());
    };
    match value.split_once(" or ") {
        Some((primary, other)) => (primary.trim().to_string(), other.trim().to_string()),
        None => (value.to_string(), String::new()),
    }
}

fn die_profile(formula: &str, count_override: Option<u32>) -> HitDiceProfile {
    let caps = DIE_PARTS.captures(formula);
    let faces = caps.as_ref().and_then(|c| c["faces"].parse().ok());
    let count = count_override.unwrap_or_else(|| {
        caps.as_ref()
            .map(|c| match &c["count"] {
                "" => 1,
                digits => digits.parse().unwrap_or(1),
            })
            .unwrap_or(0)
    });
    HitDiceProfile {
        count,
        faces,
        explicit: true,
    }
}

/// Normalize an `HD` value.
///
/// Fractional glyphs become a divisor (`½d8` -> `1d8/2`); a bare count takes
/// the default die (`3` -> `3d8`); anything unreadable falls back to
/// `default`.
fn normalize_hit_dice(value: &str, default: &str) -> HitDice {
    let value = trim_field(value);

    if let Some(caps) = FRACTIONAL_HD.captures(value) {
        let denominator = match &caps["frac"] {
            "½" | "1/2" => 2,
            "⅓" | "1/3" => 3,
            _ => 4,
        };
        let modifier: String = caps
            .name("modifier")
            .map(|m| m.as_str().chars().filter(|c| !c.is_whitespace()).collect())
            .unwrap_or_default();
        let formula = format!("1d{}/{}{}", &caps["faces"], denominator, modifier);
        let profile = die_profile(&formula, Some(0));
        return HitDice { formula, profile };
    }

    if let Some(found) = DICE_HD.find(value) {
        let mut formula: String = found.as_str().chars().filter(|c| !c.is_whitespace()).collect();
        if formula.starts_with(['d', 'D']) {
            formula.insert(0, '1');
        }
        let profile = die_profile(&formula, None);
        return HitDice { formula, profile };
    }

    if let Some(caps) = BARE_HD.captures(value) {
        let default_faces = DIE_PARTS
            .captures(default)
            .map(|c| c["faces"].to_string())
            .unwrap_or_else(|| "8".to_string());
        let formula = format!("{}d{}", &caps["count"], default_faces);
        let profile = die_profile(&formula, None);
        return HitDice { formula, profile };
    }

    log::debug!("unreadable hit dice '{}', using {}", value, default);
    let formula = default.to_string();
    let mut profile = die_profile(&formula, None);
    profile.explicit = false;
    HitDice { formula, profile }
}

// ============================================================================
// Attacks
// ============================================================================

/// Split an `Atk` value on top-level `or` and parse each clause in order.
fn parse_attacks(value: &str) -> Vec<WeaponItem> {
    if value.eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    split_top_level(value, " or ")
        .into_iter()
        .filter_map(parse_attack_clause)
        .collect()
}

/// `<name> <+hit> (melee|ranged) (<damage or special>)`, best effort.
fn parse_attack_clause(clause: &str) -> Option<WeaponItem> {
    let (head, paren) = match clause.find('(') {
        Some(open) => {
            let inner = &clause[open + 1..];
            let inner = inner.rfind(')').map(|close| &inner[..close]).unwrap_or(inner);
            (&clause[..open], inner.trim())
        }
        None => (clause, ""),
    };

    let to_hit = first_signed_modifier(head).unwrap_or_else(|| "+0".to_string());
    let name_end = TO_HIT_PATTERN
        .find(head)
        .or_else(|| ATTACK_MODE.find(head))
        .map(|m| m.start())
        .unwrap_or(head.len());
    let name = head[..name_end].trim();
    if name.is_empty() {
        return None;
    }

    let melee = !ATTACK_MODE
        .captures(head)
        .map(|caps| {
            let mode = caps["mode"].to_lowercase();
            mode == "ranged" || mode.starts_with("missile")
        })
        .unwrap_or(false);

    let (damage, description) = match LEADING_DAMAGE.captures(paren) {
        Some(caps) => {
            let damage: String = caps["damage"].chars().filter(|c| !c.is_whitespace()).collect();
            let rest = paren[caps.get(0).map(|m| m.end()).unwrap_or(0)..]
                .trim()
                .trim_start_matches(',')
                .trim();
            (damage, rest.to_string())
        }
        None => {
            // `special` and other prose-only attacks carry no damage
            let damage = first_dice_term(paren).unwrap_or_else(|| "0".to_string());
            (damage, paren.to_string())
        }
    };

    Some(WeaponItem {
        name: name.to_string(),
        to_hit,
        damage,
        melee,
        description,
    })
}

// ============================================================================
// Tests
// ============================================================================
