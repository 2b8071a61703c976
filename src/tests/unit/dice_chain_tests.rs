//! Dice Chain Unit Tests
//!
//! Chain steps applied to values the parsers produce, the way a sheet
//! changes when a character levels or a spell boosts a die.

use crate::core::dice::{DiceChain, DiceEvaluator, DiceFormula, RandomEvaluator};
use crate::ingestion::parse_npc_stat_blocks;
use crate::tests::common::*;

#[cfg(test)]
mod parsed_values {
    use super::*;

    #[test]
    fn test_bump_parsed_action_dice() {
        let champion = &parse_npc_stat_blocks(CHAMPION)[0];
        let act = field(champion, "attributes.actionDice.value");
        assert_eq!(DiceChain::bump_die(act, 1), "1d24+1d16");
        assert_eq!(DiceChain::bump_die(act, -1), "1d16+1d16");
    }

    #[test]
    fn test_bump_parsed_hit_dice() {
        let orc = &parse_npc_stat_blocks(ORCS)[0];
        let hd = field(orc, "attributes.hitDice.value");
        assert_eq!(DiceChain::bump_die(hd, 1), "2d10+2");
        assert_eq!(DiceChain::bump_die_count(hd, -2), "2d6+2");
    }

    #[test]
    fn test_fractional_hit_dice_keep_divisor() {
        let kobold = &parse_npc_stat_blocks(KOBOLD)[0];
        let hd = field(kobold, "attributes.hitDice.value");
        assert_eq!(DiceChain::bump_die(hd, 1), "1d10/2");
    }

    #[test]
    fn test_inferred_crit_die_ranks() {
        let dragon = &parse_npc_stat_blocks(DRAGON)[0];
        let die = field(dragon, "attributes.critical.die");
        assert_eq!(DiceChain::rank_dice_expression(die), 12);
        assert_eq!(DiceChain::bump_die(die, 1), "d30");
    }

    #[test]
    fn test_parsed_hit_dice_are_valid_notation() {
        for npc in parse_npc_stat_blocks(&npc_adventure()) {
            let hd = field(&npc, "attributes.hitDice.value");
            if hd.contains('/') {
                continue;
            }
            assert!(DiceFormula::parse(hd).is_ok(), "{} has hit dice {}", npc.name(), hd);
        }
    }
}

#[cfg(test)]
mod crit_rescaling {
    use super::*;

    #[test]
    fn test_crit_adjustment_for_bigger_action_die() {
        assert_eq!(DiceChain::calculate_crit_adjustment("1d20", "1d24"), 4);
        assert_eq!(DiceChain::calculate_crit_adjustment("1d20+2", "1d16"), -4);
        assert_eq!(DiceChain::calculate_crit_adjustment("+2", "1d16"), 0);
    }

    #[test]
    fn test_explicit_crit_range_rescaled() {
        let champion = &parse_npc_stat_blocks(CHAMPION)[0];
        let low = champion
            .field("attributes.critical.range")
            .and_then(|v| v.as_i64())
            .expect("crit range") as i32;
        assert_eq!(DiceChain::calculate_proportional_crit_range(low, 20, 24), 23);
        assert_eq!(DiceChain::calculate_proportional_crit_range(low, 20, 16), 15);
        assert_eq!(DiceChain::calculate_proportional_crit_range(low, 20, 3), 2);
    }

    #[test]
    fn test_window_never_drops_below_one() {
        assert_eq!(DiceChain::calculate_proportional_crit_range(2, 20, 4), 1);
        assert_eq!(DiceChain::calculate_proportional_crit_range(1, 30, 3), 1);
    }
}

#[cfg(test)]
mod rolling {
    use super::*;

    #[test]
    fn test_seeded_rolls_repeat() {
        let first = RandomEvaluator::seeded(42);
        let second = RandomEvaluator::seeded(42);
        for _ in 0..10 {
            assert_eq!(first.evaluate("3d6+1"), second.evaluate("3d6+1"));
        }
    }

    #[test]
    fn test_bumped_die_rolls_in_range() {
        let evaluator = RandomEvaluator::seeded(7);
        let formula = DiceChain::bump_die("1d20", 2);
        assert_eq!(formula, "1d30");
        for _ in 0..50 {
            let roll = evaluator.evaluate(&formula).expect("rollable");
            assert!((1..=30).contains(&roll));
        }
    }
}
