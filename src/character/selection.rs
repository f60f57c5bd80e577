//! Choice strategies for the race and class stages
//!
//! A selector picks from the options the validator says are eligible.
//! Returning `None` declines every option, which sends the pipeline back
//! to rolling abilities.

use rand::seq::IteratorRandom;
use rand::Rng;
use std::collections::BTreeSet;

use crate::character::abilities::AbilityScores;
use crate::character::factory::RestartReason;

pub trait Selector {
    fn select_race(&mut self, abilities: &AbilityScores, options: &BTreeSet<String>)
        -> Option<String>;

    fn select_class(
        &mut self,
        abilities: &AbilityScores,
        race: &str,
        options: &BTreeSet<String>,
    ) -> Option<String>;

    /// Called before each reroll; returning false stops the pipeline
    fn allow_reroll(&mut self, _reason: &RestartReason, _attempt: u32) -> bool {
        true
    }
}

/// Always takes the first option in name order
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstEligible;

impl Selector for FirstEligible {
    fn select_race(&mut self, _: &AbilityScores, options: &BTreeSet<String>) -> Option<String> {
        options.iter().next().cloned()
    }

    fn select_class(
        &mut self,
        _: &AbilityScores,
        _: &str,
        options: &BTreeSet<String>,
    ) -> Option<String> {
        options.iter().next().cloned()
    }
}

/// Uniform random choice, optionally pinned to a race and/or class
///
/// A pinned choice that is not eligible for the current roll is declined,
/// so the pipeline rerolls until the pin becomes possible.
#[derive(Debug, Clone)]
pub struct RandomSelector<R: Rng> {
    rng: R,
    race: Option<String>,
    class: Option<String>,
}

impl<R: Rng> RandomSelector<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            race: None,
            class: None,
        }
    }

    pub fn with_race(mut self, race: Option<String>) -> Self {
        self.race = race;
        self
    }

    pub fn with_class(mut self, class: Option<String>) -> Self {
        self.class = class;
        self
    }

    fn pick(&mut self, pinned: Option<&String>, options: &BTreeSet<String>) -> Option<String> {
        match pinned {
            Some(choice) => options.contains(choice).then(|| choice.clone()),
            None => options.iter().choose(&mut self.rng).cloned(),
        }
    }
}

impl<R: Rng> Selector for RandomSelector<R> {
    fn select_race(&mut self, _: &AbilityScores, options: &BTreeSet<String>) -> Option<String> {
        let pinned = self.race.clone();
        self.pick(pinned.as_ref(), options)
    }

    fn select_class(
        &mut self,
        _: &AbilityScores,
        _: &str,
        options: &BTreeSet<String>,
    ) -> Option<String> {
        let pinned = self.class.clone();
        self.pick(pinned.as_ref(), options)
    }
}
