//! Dice Evaluation
//!
//! The parsers never own randomness. When a stat block leaves out a value
//! that has to come from a formula (usually hit points), they call a
//! [`DiceEvaluator`] supplied by the host.
//!
//! Formulas here are lenient: terms joined by `+`/`-`, where each term is a
//! die (`2d8`), a constant (`3`), and may carry a `/n` divisor as produced by
//! fractional hit dice (`1d8/2`). Anything after the last term is ignored.

use std::sync::Mutex;

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

static ROLL_TERM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        (?P<sign>[+\-])?\s*
        (?:
            (?P<count>\d*)[dD](?P<faces>\d+)
            |
            (?P<constant>\d+)
        )
        (?:\s*/\s*(?P<divisor>\d+))?
        ",
    )
    .expect("Failed to compile roll term regex")
});

/// A formula broken into rollable pieces.
#[derive(Debug, Clone, PartialEq)]
struct RollPlan {
    terms: Vec<RollTerm>,
}

#[derive(Debug, Clone, PartialEq)]
struct RollTerm {
    negative: bool,
    kind: RollKind,
    divisor: u32,
}

#[derive(Debug, Clone, PartialEq)]
enum RollKind {
    Dice { count: u32, faces: u32 },
    Constant(u32),
}

impl RollPlan {
    fn parse(formula: &str) -> Option<Self> {
        let mut terms = Vec::new();
        for caps in ROLL_TERM_PATTERN.captures_iter(formula) {
            let negative = caps.name("sign").is_some_and(|m| m.as_str() == "-");
            let divisor = caps
                .name("divisor")
                .and_then(|m| m.as_str().parse().ok())
                .filter(|d: &u32| *d > 0)
                .unwrap_or(1);

            let kind = if let Some(faces) = caps.name("faces") {
                let faces: u32 = faces.as_str().parse().ok()?;
                let count = match caps.name("count").map(|m| m.as_str()) {
                    Some("") | None => 1,
                    Some(digits) => digits.parse().ok()?,
                };
                if faces == 0 {
                    continue;
                }
                RollKind::Dice { count, faces }
            } else {
                let value = caps.name("constant")?.as_str().parse().ok()?;
                RollKind::Constant(value)
            };

            terms.push(RollTerm { negative, kind, divisor });
        }

        if terms.is_empty() {
            None
        } else {
            Some(Self { terms })
        }
    }

    fn total(&self, mut roll_term: impl FnMut(&RollKind) -> f64) -> i64 {
        self.terms
            .iter()
            .map(|term| {
                let value = (roll_term(&term.kind) / term.divisor as f64).floor();
                let value = match term.kind {
                    RollKind::Dice { .. } => value.max(1.0),
                    RollKind::Constant(_) => value,
                };
                if term.negative {
                    -value
                } else {
                    value
                }
            })
            .sum::<f64>() as i64
    }
}

/// Resolves a formula to a number.
pub trait DiceEvaluator: Send + Sync {
    /// Evaluate `formula`, or `None` when it holds nothing rollable.
    fn evaluate(&self, formula: &str) -> Option<i64>;
}

/// Deterministic evaluator: each die contributes its expected value,
/// divided terms are floored.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageEvaluator;

impl DiceEvaluator for AverageEvaluator {
    fn evaluate(&self, formula: &str) -> Option<i64> {
        let plan = RollPlan::parse(formula)?;
        Some(plan.total(|kind| match *kind {
            RollKind::Dice { count, faces } => count as f64 * (faces as f64 + 1.0) / 2.0,
            RollKind::Constant(value) => value as f64,
        }))
    }
}

/// Random evaluator backed by a seedable RNG.
#[derive(Debug)]
pub struct RandomEvaluator {
    rng: Mutex<StdRng>,
}

impl RandomEvaluator {
    /// Seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceEvaluator for RandomEvaluator {
    fn evaluate(&self, formula: &str) -> Option<i64> {
        let plan = RollPlan::parse(formula)?;
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Some(plan.total(|kind| match *kind {
            RollKind::Dice { count, faces } if count > MAX_ROLLED_DICE => {
                approximate_total(&mut *rng, count, faces)
            }
            RollKind::Dice { count, faces } => {
                (0..count).map(|_| rng.gen_range(1..=faces) as f64).sum()
            }
            RollKind::Constant(value) => value as f64,
        }))
    }
}

/// Dice counts above this are summed from a normal approximation instead of
/// one draw per die.
const MAX_ROLLED_DICE: u32 = 1_000;

/// Sample the sum of `count` d`faces` from its mean and variance, clamped to
/// the reachable range.
fn approximate_total<R: Rng + ?Sized>(rng: &mut R, count: u32, faces: u32) -> f64 {
    let n = count as f64;
    let f = faces as f64;
    let mean = n * (f + 1.0) / 2.0;
    let std_dev = (n * (f * f - 1.0) / 12.0).sqrt();

    // Box-Muller
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();

    (mean + z * std_dev).round().clamp(n, n * f)
}
