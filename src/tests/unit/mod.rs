//! Stat Block Unit Tests
//!
//! Fixture-driven tests over whole adventures and character sheets:
//!
//! ### NPC blocks (`npc_parser_tests`)
//! - Segmentation and per-block defaults
//! - Attack lists, saves, movement
//! - Crit inference across creature families
//!
//! ### PC sheets (`pc_parser_tests`)
//! - JSON exports, party arrays, salvage
//! - 0-level funnel sheets and leveled sheets
//!
//! ### Dice chain (`dice_chain_tests`)
//! - Level-up style bumps of action, crit and hit dice

mod dice_chain_tests;
mod pc_parser_tests;
