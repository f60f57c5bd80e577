//! Dice service consumed by the generation pipeline
//!
//! The pipeline only ever asks for a total of `N` dice of `S` sides. Two
//! implementations are provided: [`RandomDice`] over any `rand::Rng`, and
//! [`ScriptedDice`] which replays fixed totals for deterministic runs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::fmt;

/// `count` dice of `sides` sides, summed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiceExpression {
    pub count: u32,
    pub sides: u32,
}

impl DiceExpression {
    pub const fn new(count: u32, sides: u32) -> Self {
        Self { count, sides }
    }

    /// A single die
    pub const fn d(sides: u32) -> Self {
        Self::new(1, sides)
    }

    pub fn min(&self) -> i32 {
        saturating_total(self.count)
    }

    pub fn max(&self) -> i32 {
        saturating_total(self.count.saturating_mul(self.sides))
    }
}

fn saturating_total(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// Source of dice totals
pub trait DiceRoller {
    fn roll(&mut self, expr: DiceExpression) -> i32;
}

impl<D: DiceRoller + ?Sized> DiceRoller for &mut D {
    fn roll(&mut self, expr: DiceExpression) -> i32 {
        (**self).roll(expr)
    }
}

/// Uniform dice backed by a random number generator
#[derive(Debug, Clone)]
pub struct RandomDice<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomDice<ChaCha8Rng> {
    /// Deterministic dice for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> DiceRoller for RandomDice<R> {
    fn roll(&mut self, expr: DiceExpression) -> i32 {
        if expr.sides == 0 {
            return 0;
        }
        (0..expr.count)
            .map(|_| saturating_total(self.rng.gen_range(1..=expr.sides)))
            .fold(0i32, i32::saturating_add)
    }
}

/// Replays a fixed sequence of totals, one per `roll` call
///
/// Every expression asked for is recorded so tests can check which dice the
/// pipeline requested. Once the script runs out each roll returns the
/// expression's minimum.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    totals: VecDeque<i32>,
    requested: Vec<DiceExpression>,
}

impl ScriptedDice {
    pub fn new(totals: impl IntoIterator<Item = i32>) -> Self {
        Self {
            totals: totals.into_iter().collect(),
            requested: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.totals.len()
    }

    /// Expressions requested so far, in call order
    pub fn requested(&self) -> &[DiceExpression] {
        &self.requested
    }
}

impl DiceRoller for ScriptedDice {
    fn roll(&mut self, expr: DiceExpression) -> i32 {
        self.requested.push(expr);
        match self.totals.pop_front() {
            Some(total) => total,
            None => {
                tracing::warn!("Dice script exhausted, rolling minimum for {}", expr);
                expr.min()
            }
        }
    }
}
