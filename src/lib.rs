/// dcc-statblock - DCC RPG stat-block ingestion
///
/// Core library providing NPC and PC stat-block parsers and dice-chain
/// math for Dungeon Crawl Classics content.

pub mod config;
pub mod core;
pub mod ingestion;

#[cfg(test)]
mod tests;

pub use crate::core::dice::{DiceChain, DiceEvaluator, DiceFormula, DICE_CHAIN};
pub use crate::ingestion::{
    import, parse_npc_stat_blocks, parse_pc_stat_blocks, ImportError, ImportKind, Importer,
    ParsedCharacter, ParsedItem,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
