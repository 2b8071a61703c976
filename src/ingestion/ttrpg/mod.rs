//! DCC Stat Block Processing Module
//!
//! Text parsers for Dungeon Crawl Classics stat blocks:
//!
//! - **NPC Parsing**: semicolon-delimited monster blocks, one per paragraph
//! - **PC Parsing**: generator JSON exports and plain-text character sheets
//! - **Crit Inference**: crit table and die from hit dice and creature type
//! - **Records**: flat dotted-path field maps plus ordered item lists
//!
//! # Example
//!
//! ```
//! use dcc_statblock::ingestion::ttrpg::NpcParser;
//!
//! let npcs = NpcParser::new().parse("Goblin (4): Init +1; AC 12; HD 1d6; AL C");
//! assert_eq!(npcs[0].name(), "Goblin");
//! assert_eq!(npcs[0].text("details.alignment"), Some("c"));
//! ```

pub mod crit;
pub mod models;
pub mod npc_parser;
pub mod pc_parser;
pub mod text_utils;

pub use crit::{CreatureFamily, CriticalProfile, HitDiceProfile, DEFAULT_CRIT_RANGE};
pub use models::{
    ArmorItem, CurrencyItem, Denomination, EquipmentItem, FieldValue, ParsedCharacter, ParsedItem,
    SpellItem, WeaponItem, UNNAMED,
};
pub use npc_parser::{NpcParseOptions, NpcParser};
pub use pc_parser::{PcParseOptions, PcParser, PcSource};
