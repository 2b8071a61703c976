//! Property-Based Tests
//!
//! Uses proptest to verify invariants that must hold for arbitrary input.
//!
//! ## Modules
//!
//! ### Dice Chain (`dice_chain_props`)
//! - A zero step returns the formula unchanged
//! - Bumped dice stay on the chain and clamp at both ends
//! - Crit adjustment is the face difference of the largest dice
//! - Rescaled crit windows keep their width and never drop below 1
//!
//! ### Notation (`notation_props`)
//! - Validation never panics on arbitrary strings
//! - Generated well-formed formulas are accepted
//! - Formulas survive a display/parse cycle
//!
//! ### Parsers (`parser_props`)
//! - One NPC record per non-blank block, each with a non-empty name
//! - The PC parser never panics on arbitrary text or JSON-ish input
//! - JSON ability scores keep their type

mod notation_props;
mod parser_props;
