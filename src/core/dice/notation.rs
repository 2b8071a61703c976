//! Dice Notation Validation
//!
//! Strict parsing of dice formulas such as `1d20`, `d20`, `2d6-2` and
//! `1d20+1d4`. The scanner walks the input once and checks each term with an
//! anchored pattern, so validation stays linear on any input.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::DiceNotationError;

// ============================================================================
// Patterns
// ============================================================================

static DIE_TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<count>\d*)[dD](?P<faces>\d+)$").expect("Failed to compile die term regex")
});

static CONSTANT_TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("Failed to compile constant term regex"));

// ============================================================================
// Types
// ============================================================================

/// Operator in front of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    fn as_char(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
        }
    }
}

/// One additive term of a formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormulaTerm {
    /// `count?dfaces`; a missing count means one die.
    Dice {
        sign: Sign,
        count: Option<u32>,
        faces: u32,
    },
    /// A flat modifier.
    Constant { sign: Sign, value: u32 },
}

impl FormulaTerm {
    pub fn sign(&self) -> Sign {
        match self {
            Self::Dice { sign, .. } | Self::Constant { sign, .. } => *sign,
        }
    }
}

/// A validated dice formula.
///
/// Serializes as its canonical string and refuses invalid strings on
/// deserialization, so it can guard persisted schema fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceFormula {
    terms: Vec<FormulaTerm>,
}

impl DiceFormula {
    /// Parse and validate `notation`.
    pub fn parse(notation: &str) -> Result<Self, DiceNotationError> {
        let trimmed = notation.trim();
        if trimmed.is_empty() {
            return Err(DiceNotationError::Empty);
        }

        let mut terms = Vec::new();
        let mut sign = Sign::Plus;
        let mut start = 0;

        for (idx, ch) in trimmed.char_indices() {
            if ch == '+' || ch == '-' {
                terms.push(parse_term(&trimmed[start..idx], sign)?);
                sign = if ch == '+' { Sign::Plus } else { Sign::Minus };
                start = idx + ch.len_utf8();
            }
        }
        terms.push(parse_term(&trimmed[start..], sign)?);

        if !terms.iter().any(|t| matches!(t, FormulaTerm::Dice { .. })) {
            return Err(DiceNotationError::NoDice {
                formula: trimmed.to_string(),
            });
        }

        Ok(Self { terms })
    }

    pub fn terms(&self) -> &[FormulaTerm] {
        &self.terms
    }

    /// Largest face count among the die terms.
    pub fn largest_faces(&self) -> u32 {
        self.terms
            .iter()
            .filter_map(|t| match t {
                FormulaTerm::Dice { faces, .. } => Some(*faces),
                FormulaTerm::Constant { .. } => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Sum of the flat modifiers.
    pub fn modifier(&self) -> i64 {
        self.terms
            .iter()
            .map(|t| match t {
                FormulaTerm::Constant { sign: Sign::Plus, value } => *value as i64,
                FormulaTerm::Constant { sign: Sign::Minus, value } => -(*value as i64),
                FormulaTerm::Dice { .. } => 0,
            })
            .sum()
    }
}

fn parse_term(raw: &str, sign: Sign) -> Result<FormulaTerm, DiceNotationError> {
    let term = raw.trim();
    if term.is_empty() {
        return Err(DiceNotationError::invalid_term(raw));
    }

    if let Some(caps) = DIE_TERM.captures(term) {
        let count = match &caps["count"] {
            "" => None,
            digits => {
                let count: u32 = digits
                    .parse()
                    .map_err(|_| DiceNotationError::invalid_term(term))?;
                if count == 0 {
                    return Err(DiceNotationError::ZeroCount { term: term.to_string() });
                }
                Some(count)
            }
        };
        let faces: u32 = caps["faces"]
            .parse()
            .map_err(|_| DiceNotationError::invalid_term(term))?;
        if faces == 0 {
            return Err(DiceNotationError::ZeroFaces { term: term.to_string() });
        }
        return Ok(FormulaTerm::Dice { sign, count, faces });
    }

    if CONSTANT_TERM.is_match(term) {
        let value: u32 = term
            .parse()
            .map_err(|_| DiceNotationError::invalid_term(term))?;
        return Ok(FormulaTerm::Constant { sign, value });
    }

    Err(DiceNotationError::invalid_term(term))
}

/// `true` when `notation` parses as a [`DiceFormula`].
pub fn is_valid_dice_notation(notation: &str) -> bool {
    DiceFormula::parse(notation).is_ok()
}

impl FromStr for DiceFormula {
    type Err = DiceNotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DiceFormula {
    type Error = DiceNotationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DiceFormula> for String {
    fn from(formula: DiceFormula) -> Self {
        formula.to_string()
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, term) in self.terms.iter().enumerate() {
            if idx > 0 {
                write!(f, "{}", term.sign().as_char())?;
            }
            match term {
                FormulaTerm::Dice { count: Some(count), faces, .. } => write!(f, "{}d{}", count, faces)?,
                FormulaTerm::Dice { count: None, faces, .. } => write!(f, "d{}", faces)?,
                FormulaTerm::Constant { value, .. } => write!(f, "{}", value)?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
