//! Critical Hit Profiles
//!
//! Explicit `Crit` fields are taken as written. When a monster block has
//! none, the profile is inferred from its hit dice and from keywords in its
//! name and special abilities, checked in a fixed priority order:
//! dragon, giant, demon, undead, then a humanoid default keyed on the hit
//! die. A block with no usable hit die falls back to `M/d20`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::dice::{DiceChain, DICE_CHAIN};

/// Natural roll that crits when nothing widens the window.
pub const DEFAULT_CRIT_RANGE: i64 = 20;

/// Giants at or above this many hit dice roll on table G; smaller ones on M.
const GIANT_TABLE_MIN_HD: u32 = 6;

// ============================================================================
// Types
// ============================================================================

/// Crit die, crit table, and the lowest natural roll that crits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalProfile {
    pub die: String,
    pub table: String,
    pub range: i64,
}

impl CriticalProfile {
    pub fn new(die: impl Into<String>, table: impl Into<String>, range: i64) -> Self {
        Self {
            die: die.into(),
            table: table.into(),
            range,
        }
    }
}

/// Creature family used to pick a crit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureFamily {
    Dragon,
    Giant,
    Demon,
    Undead,
    Other,
}

/// Hit-dice facts the inference needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitDiceProfile {
    /// Number of dice; `0` for fractional hit dice.
    pub count: u32,
    /// Face count of the hit die.
    pub faces: Option<u32>,
    /// `true` when the block carried an `HD` field.
    pub explicit: bool,
}

// ============================================================================
// Patterns
// ============================================================================

static EXPLICIT_CRIT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \bCrit\s*
        (?:
            (?P<low>\d+)\s*-\s*(?:\d+)?\s*  # Optional range, low bound kept
        )?
        (?P<table>[A-Za-z]+)
        \s*/\s*
        (?P<die>\d*[dD]\d+(?:[+\-]\d+)?)
        ",
    )
    .expect("Failed to compile crit regex")
});

static DRAGON_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:dragons?|wyrms?|drakes?|wyverns?)\b").expect("Failed to compile dragon regex")
});

static GIANT_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:giants?|ogres?|trolls?|ettins?|cyclops|titans?)\b")
        .expect("Failed to compile giant regex")
});

static DEMON_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:demons?|devils?|fiends?|daemons?|demonic|imps?)\b")
        .expect("Failed to compile demon regex")
});

static UNDEAD_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:un-?dead|zombies?|skeletons?|ghouls?|ghosts?|wights?|wraiths?|vampires?|liche?s?|mumm(?:y|ies)|spectres?|specters?)\b",
    )
    .expect("Failed to compile undead regex")
});

// ============================================================================
// Inference
// ============================================================================

/// Parse an explicit `Crit <low>-<high> <table>/<die>` or `Crit <table>/<die>`.
pub fn parse_explicit(text: &str) -> Option<CriticalProfile> {
    let caps = EXPLICIT_CRIT_PATTERN.captures(text)?;
    let range = caps
        .name("low")
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(DEFAULT_CRIT_RANGE);
    Some(CriticalProfile::new(&caps["die"], &caps["table"], range))
}

/// Classify a creature by keywords in its name and special text.
pub fn classify(name: &str, special: &str) -> CreatureFamily {
    let haystack = format!("{} {}", name, special);
    if DRAGON_KEYWORDS.is_match(&haystack) {
        CreatureFamily::Dragon
    } else if GIANT_KEYWORDS.is_match(&haystack) {
        CreatureFamily::Giant
    } else if DEMON_KEYWORDS.is_match(&haystack) {
        CreatureFamily::Demon
    } else if UNDEAD_KEYWORDS.is_match(&haystack) {
        CreatureFamily::Undead
    } else {
        CreatureFamily::Other
    }
}

/// Monster crit die by hit-dice count.
pub fn monster_crit_die(hd_count: u32) -> &'static str {
    match hd_count {
        0..=1 => "d4",
        2 => "d6",
        3..=4 => "d8",
        5..=6 => "d10",
        7..=8 => "d12",
        9..=10 => "d14",
        11..=12 => "d16",
        _ => "d20",
    }
}

/// Infer a crit profile for a block without an explicit `Crit` field.
pub fn infer(name: &str, special: &str, hit_dice: &HitDiceProfile) -> CriticalProfile {
    let family = classify(name, special);
    let by_hd = monster_crit_die(hit_dice.count);

    let profile = match family {
        CreatureFamily::Dragon => {
            // Dragons roll the biggest die on the chain
            let top = DICE_CHAIN.len() as i32;
            CriticalProfile::new(DiceChain::bump_die(by_hd, top), "DR", DEFAULT_CRIT_RANGE)
        }
        CreatureFamily::Giant => {
            let table = if hit_dice.count >= GIANT_TABLE_MIN_HD { "G" } else { "M" };
            CriticalProfile::new(by_hd, table, DEFAULT_CRIT_RANGE)
        }
        CreatureFamily::Demon => CriticalProfile::new(by_hd, "DN", DEFAULT_CRIT_RANGE),
        CreatureFamily::Undead => CriticalProfile::new(by_hd, "U", DEFAULT_CRIT_RANGE),
        CreatureFamily::Other => match hit_dice.faces.filter(|_| hit_dice.explicit) {
            Some(faces) => CriticalProfile::new(format!("d{}", faces), "III", DEFAULT_CRIT_RANGE),
            None => CriticalProfile::new("d20", "M", DEFAULT_CRIT_RANGE),
        },
    };

    log::trace!(
        "inferred crit {}/{} for '{}' ({:?}, {} HD)",
        profile.table,
        profile.die,
        name,
        family,
        hit_dice.count
    );
    profile
}
