//! Dice
//!
//! Dice-chain arithmetic, strict notation validation, and the evaluator
//! port used when a stat block leaves a value to be rolled.

pub mod chain;
pub mod error;
pub mod notation;
pub mod roller;

pub use chain::{DiceChain, DICE_CHAIN};
pub use error::DiceNotationError;
pub use notation::{is_valid_dice_notation, DiceFormula, FormulaTerm, Sign};
pub use roller::{AverageEvaluator, DiceEvaluator, RandomEvaluator};
