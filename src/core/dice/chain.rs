//! Dice Chain Module
//!
//! DCC's ordered ladder of die sizes and the arithmetic built on top of it:
//! stepping dice up or down the chain, the face delta between two formulas,
//! and rescaling a critical-hit window onto a different die.
//!
//! Every function here is total. A formula without a recognizable die term
//! degrades to a no-op (bump operations) or to zero (adjustments), so the
//! engine can be called speculatively while inferring stat-block values.
//!
//! # Example
//!
//! ```
//! use dcc_statblock::core::dice::DiceChain;
//!
//! assert_eq!(DiceChain::bump_die("1d20+2", 1), "1d24+2");
//! assert_eq!(DiceChain::bump_die("1d8 [untrained]", -2), "1d6 [untrained]");
//! assert_eq!(DiceChain::calculate_proportional_crit_range(18, 20, 24), 22);
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// ============================================================================
// Constants
// ============================================================================

/// The dice chain, smallest to largest. Never mutated.
pub const DICE_CHAIN: [u32; 13] = [3, 4, 5, 6, 7, 8, 10, 12, 14, 16, 20, 24, 30];

/// A single die term: optional count, `d` or `D`, face count.
static DIE_TERM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        (?P<count>\d*)      # Optional count
        [dD]                # The 'd' separator
        (?P<faces>\d+)      # Face count
        ",
    )
    .expect("Failed to compile die term regex")
});

// ============================================================================
// Helpers
// ============================================================================

/// Split a formula into the part that holds dice and a trailing `[tag]`.
///
/// Only the text before the first `[` is scanned for die terms; the tag is
/// carried through verbatim.
fn split_flavor_tag(formula: &str) -> (&str, &str) {
    match formula.find('[') {
        Some(idx) => formula.split_at(idx),
        None => (formula, ""),
    }
}

fn faces_of(caps: &Captures<'_>) -> Option<u32> {
    caps.name("faces").and_then(|m| m.as_str().parse().ok())
}

/// Move a canonical die size `steps` ranks along the chain, clamping at both
/// ends. Returns `None` for sizes that are not on the chain.
fn step_size(size: u32, steps: i32) -> Option<u32> {
    let rank = DiceChain::rank_of(size);
    if rank < 0 {
        return None;
    }
    let top = DICE_CHAIN.len() as i64 - 1;
    let target = (rank as i64 + steps as i64).clamp(0, top);
    Some(DICE_CHAIN[target as usize])
}

// ============================================================================
// Engine
// ============================================================================

/// Pure functions over [`DICE_CHAIN`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DiceChain;

impl DiceChain {
    /// Index of `die_size` in the chain, or `-1` when it is not a chain size.
    pub fn rank_of(die_size: u32) -> i32 {
        DICE_CHAIN
            .iter()
            .position(|&size| size == die_size)
            .map(|idx| idx as i32)
            .unwrap_or(-1)
    }

    /// Face count of the largest die term in `formula`, ignoring any
    /// trailing bracketed tag.
    pub fn largest_die(formula: &str) -> Option<u32> {
        let (body, _) = split_flavor_tag(formula);
        DIE_TERM_PATTERN
            .captures_iter(body)
            .filter_map(|caps| faces_of(&caps))
            .max()
    }

    /// Rank of the largest chain-sized die term in `formula`, `-1` if none.
    pub fn rank_dice_expression(formula: &str) -> i32 {
        let (body, _) = split_flavor_tag(formula);
        DIE_TERM_PATTERN
            .captures_iter(body)
            .filter_map(|caps| faces_of(&caps))
            .map(Self::rank_of)
            .max()
            .unwrap_or(-1)
    }

    /// Step the largest-faced die in `formula` by `steps` ranks.
    ///
    /// Counts, modifiers, other die terms and a trailing `[tag]` are kept
    /// verbatim. The first term wins when several share the largest size.
    /// Formulas without a chain-sized die come back unchanged.
    pub fn bump_die(formula: &str, steps: i32) -> String {
        if steps == 0 {
            return formula.to_string();
        }

        let (body, tag) = split_flavor_tag(formula);

        let mut largest: Option<(u32, std::ops::Range<usize>)> = None;
        for caps in DIE_TERM_PATTERN.captures_iter(body) {
            let (Some(faces), Some(span)) = (faces_of(&caps), caps.name("faces")) else {
                continue;
            };
            if largest.as_ref().map_or(true, |(best, _)| faces > *best) {
                largest = Some((faces, span.range()));
            }
        }

        let Some((faces, range)) = largest else {
            return formula.to_string();
        };
        let Some(stepped) = step_size(faces, steps) else {
            log::trace!("die d{faces} in '{formula}' is off the chain, not bumping");
            return formula.to_string();
        };

        format!("{}{}{}{}", &body[..range.start], stepped, &body[range.end..], tag)
    }

    /// Step every chain-sized die term in `formula` by `steps` ranks.
    ///
    /// Used for compound hit-dice strings where each term moves together.
    /// Counts and modifiers are untouched; off-chain sizes stay as written.
    pub fn bump_die_count(formula: &str, steps: i32) -> String {
        if steps == 0 {
            return formula.to_string();
        }

        let (body, tag) = split_flavor_tag(formula);
        let bumped = DIE_TERM_PATTERN.replace_all(body, |caps: &Captures<'_>| {
            let original = caps[0].to_string();
            match faces_of(caps).and_then(|faces| step_size(faces, steps)) {
                Some(stepped) => {
                    let d = if original.contains('D') { "D" } else { "d" };
                    format!("{}{}{}", &caps["count"], d, stepped)
                }
                None => original,
            }
        });

        format!("{}{}", bumped, tag)
    }

    /// Face delta between the largest dice of two formulas.
    ///
    /// Returns `new - old`, or `0` when either side has no die term or the
    /// delta does not fit an `i32`.
    pub fn calculate_crit_adjustment(old_formula: &str, new_formula: &str) -> i32 {
        match (Self::largest_die(old_formula), Self::largest_die(new_formula)) {
            (Some(old), Some(new)) => i32::try_from(i64::from(new) - i64::from(old)).unwrap_or(0),
            _ => 0,
        }
    }

    /// Rescale a crit window `[old_low, old_faces]` onto a `new_faces` die.
    ///
    /// The number of winning faces is preserved at the top of the new die,
    /// and the window never extends below face 1.
    pub fn calculate_proportional_crit_range(old_low: i32, old_faces: i32, new_faces: i32) -> i32 {
        let width = (i64::from(old_faces) - i64::from(old_low) + 1).max(0);
        let new_low = (i64::from(new_faces) - width + 1).max(1);
        i32::try_from(new_low).unwrap_or(i32::MAX)
    }
}

// ============================================================================
// Tests
// ============================================================================
