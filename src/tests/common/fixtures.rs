//! Test Fixtures
//!
//! Stat blocks and character sheets in the shapes published adventures and
//! character generators produce.

use crate::ingestion::ttrpg::{ParsedCharacter, ParsedItem, WeaponItem};

// =============================================================================
// NPC Blocks
// =============================================================================

pub const ORCS: &str = "Cute-Infused Orcs (3): Init +2; Atk claw +1 melee (1d4) or spear +1 melee (1d8); AC 15; HD 2d8+2; hp 13 each; MV 30'; Act 1d20; SP none; SV Fort +3, Ref +0, Will -1; AL C.";

pub const CULTIST: &str = "Smultist (6): Init +0; Atk dagger +1 melee (1d4) or spell (special); AC 11; HD 1d8; hp 5; MV 30'; Act 1d20; SP spells (cantrip; frighten), immune to charm; SV Fort +0, Ref +1, Will +2; AL C.";

pub const DRAGON: &str = "Young red dragon: Init +4; Atk bite +8 melee (2d8+4) or claw +6 melee (1d10); AC 19; HD 9d12; hp 60; MV 40' or fly 80'; Act 2d20; SP breath weapon (fire; 30' cone); SV Fort +8, Ref +5, Will +6; AL C.";

pub const MOLE: &str = "Giant mole: Init -1; Atk bite +2 melee (1d6); AC 13; HD 3d8; MV 25' or climb 25' or burrow 10'; Act 1d20; SV Fort +4, Ref -1, Will +0; AL N.";

pub const KOBOLD: &str = "Kobold (2d4): Init +1; Atk spear +0 melee (1d6-1) or sling +1 missile fire (1d3); AC 12; HD ½d8; MV 20'; Act 1d20; SV Fort +0, Ref +1, Will -1; AL L.";

pub const ZOMBIE: &str = "Zombie: Init -4; Atk slam +1 melee (1d4); AC 9; HD 2d6; hp 7; MV 20'; Act 1d20; SP un-dead traits; SV Fort +4, Ref -4, Will +0; AL C.";

pub const CHAMPION: &str = "Chaos champion: Init +3; Atk greatsword +6 melee (1d10+3); Crit 19-20 IV/1d16; AC 18; HD 5d12; hp 40; MV 20'; Act 1d20+1d16; SV Fort +5, Ref +1, Will +3; AL C.";

/// Every NPC fixture separated by blank lines.
pub fn npc_adventure() -> String {
    [ORCS, CULTIST, DRAGON, MOLE, KOBOLD, ZOMBIE, CHAMPION].join("\n\n")
}

// =============================================================================
// PC Sheets
// =============================================================================

pub const GONGFARMER_JSON: &str = r#"{
  "occTitle": "Gongfarmer",
  "strengthScore": "10",
  "agilityScore": "12",
  "staminaScore": "8",
  "personalityScore": "15",
  "intelligenceScore": "9",
  "luckScore": "13",
  "armorClass": "10",
  "hitPoints": "3",
  "weapon": "Trowel (as club) -1 (dmg 1d4-1)",
  "startingFunds": "33 cp",
  "saveReflex": "0",
  "saveFort": "-1",
  "saveWill": "1",
  "equipment": "Backpack (2 gp)",
  "tradeGood": "Sack of night soil"
}"#;

pub const PARTY_JSON: &str = r#"{
  "characters": [
    {"occTitle": "Miller", "strengthScore": 14, "hitPoints": 4, "weapon": "Club +1 melee (1d4+1)"},
    {"occTitle": "Trapper", "agilityScore": 16, "hitPoints": 2, "weapon": "Sling +2 (1d4)"},
    {"className": "Warrior", "level": 3, "weapon": "Longsword d4+2 melee (1d8+deed+2)"}
  ]
}"#;

pub const FUNNEL_TEXT: &str = "0-level Occupation: Gongfarmer
Strength: 10 (0)
Agility: 12 (0)
Stamina: 8 (-1)
Personality: 15 (+1)
Intelligence: 9 (0)
Luck: 13 (+1)

AC: 10; HP: 3
Weapon: Trowel (as club) -1 (dmg 1d4-1)
Speed: 30; Init: 0; Ref: 0; Fort: -1; Will: 1

Equipment: Backpack (2 gp)
Trade good: Sack of night soil
Starting Funds: 33 cp
Lucky sign: Birdsong (Number of languages) (+1)
Languages: Common

0-level Occupation: Elven barrister
Strength: 7 (-1)
Agility: 14 (+1)
Stamina: 11 (0)
Personality: 16 (+2)
Intelligence: 13 (+1)
Luck: 9 (0)

AC: 11; HP: 2
Weapon: Quill (as dart) +1 ranged (dmg 1d2)
Speed: 30; Init: 1; Ref: 1; Fort: 0; Will: 2

Equipment: Flask (3 cp)
Trade good: Book
Starting Funds: 4 sp + 26 cp
Lucky sign: Fox's cunning (Find/disable traps) (0)
Languages: Common, Elf";

pub const WIZARD_TEXT: &str = "Chaotic Wizard (3rd level)
Occupation: Astrologer
Strength: 8 (-1)
Agility: 11 (0)
Stamina: 10 (0)
Personality: 12 (0)
Intelligence: 17 (+2)
Luck: 14 (+1)

HP: 9; Speed: 30; Init: 0
Ref: 1; Fort: 1; Will: 2

Base Attack Mod: +1
Attack Dice: 1d20; Crit Die/Table: 1d6/I
Occupation Weapon: Dart +1 ranged (1d4)
Main Weapon: Staff +1 melee (1d4)

AC: (10) (Unarmored (+0) Check penalty (0) Fumble die (d4))
Equipment: Spell book
Starting Funds: 3 gp + 12 sp

Spells: (Spell Check: d20+5)
1) Magic Missile
1) Ward Portal
2) Scorching Ray";

// =============================================================================
// Lookups
// =============================================================================

/// Text field or panic with the missing path.
pub fn field<'a>(record: &'a ParsedCharacter, path: &str) -> &'a str {
    record
        .text(path)
        .unwrap_or_else(|| panic!("'{}' has no text field {}", record.name(), path))
}

pub fn weapons(record: &ParsedCharacter) -> Vec<&WeaponItem> {
    record.weapons().collect()
}

pub fn weapon_names(record: &ParsedCharacter) -> Vec<&str> {
    record.weapons().map(|w| w.name.as_str()).collect()
}

pub fn count_items(record: &ParsedCharacter, matches: impl Fn(&ParsedItem) -> bool) -> usize {
    record.items().iter().filter(|item| matches(item)).count()
}
