//! Property tests for dice notation validation

use std::time::{Duration, Instant};

use proptest::prelude::*;

use crate::core::dice::{is_valid_dice_notation, DiceFormula};

// ============================================================================
// Strategies
// ============================================================================

fn die_term() -> impl Strategy<Value = String> {
    (prop::option::of(1u32..100), 1u32..1000).prop_map(|(count, faces)| match count {
        Some(count) => format!("{}d{}", count, faces),
        None => format!("d{}", faces),
    })
}

fn term() -> impl Strategy<Value = String> {
    prop_oneof![3 => die_term(), 1 => (0u32..100).prop_map(|n| n.to_string())]
}

/// A die term followed by any mix of signed terms.
fn valid_formula() -> impl Strategy<Value = String> {
    (
        die_term(),
        prop::collection::vec((prop::bool::ANY, term()), 0..4),
    )
        .prop_map(|(first, rest)| {
            rest.into_iter().fold(first, |mut acc, (plus, term)| {
                acc.push(if plus { '+' } else { '-' });
                acc.push_str(&term);
                acc
            })
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_never_panics(input in ".{0,64}") {
        let _ = is_valid_dice_notation(&input);
    }

    #[test]
    fn prop_accepts_generated_formulas(formula in valid_formula()) {
        prop_assert!(is_valid_dice_notation(&formula), "rejected {}", formula);
    }

    #[test]
    fn prop_display_parses_back(formula in valid_formula()) {
        let parsed = DiceFormula::parse(&formula).expect("valid formula");
        let reparsed = DiceFormula::parse(&parsed.to_string()).expect("display is valid");
        prop_assert_eq!(parsed, reparsed);
    }

    #[test]
    fn prop_constants_alone_are_rejected(n in 0u32..1000, m in 0u32..1000) {
        let constant_only = format!("{}+{}", n, m);
        prop_assert!(!is_valid_dice_notation(&constant_only));
    }

    #[test]
    fn prop_repeated_input_stays_fast(repeats in 100usize..2000) {
        let input = "1d".repeat(repeats);
        let start = Instant::now();
        prop_assert!(!is_valid_dice_notation(&input));
        prop_assert!(start.elapsed() < Duration::from_millis(250));
    }
}
