//! Dice Notation Error Types
//!
//! Only the strict [`DiceFormula`](super::DiceFormula) constructor produces
//! these; chain arithmetic and the stat-block parsers never fail.

use thiserror::Error;

/// Reasons a string is rejected as dice notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiceNotationError {
    /// Nothing but whitespace.
    #[error("Dice notation is empty")]
    Empty,

    /// A term between operators is not a die or an integer.
    #[error("Invalid dice term '{term}'")]
    InvalidTerm { term: String },

    /// A die term with an explicit count of zero, e.g. `0d6`.
    #[error("Dice count must be at least 1 in '{term}'")]
    ZeroCount { term: String },

    /// A die term with zero faces, e.g. `1d0`.
    #[error("Die faces must be at least 1 in '{term}'")]
    ZeroFaces { term: String },

    /// Well-formed arithmetic that never rolls a die, e.g. `3+2`.
    #[error("Formula '{formula}' contains no dice")]
    NoDice { formula: String },
}

impl DiceNotationError {
    pub(crate) fn invalid_term(term: impl Into<String>) -> Self {
        Self::InvalidTerm { term: term.into() }
    }
}
