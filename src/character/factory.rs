//! Character generation pipeline
//!
//! Stages run in a fixed order:
//!
//! ```text
//! RollAbilities -> SelectRace -> SelectClass -> ComputeDerived -> Done
//!       ^               |             |
//!       +---------------+-------------+   (restart: nothing eligible)
//! ```
//!
//! A restart is not an error. It is returned as [`Step::Restart`] and the
//! driver decides whether to roll again. Validation failures on an explicit
//! request are terminal for that request and come back as
//! `CharGenError::Validation`.
//!
//! Dice are consumed in a fixed order: six ability rolls, then hit points,
//! then starting gold.

use std::collections::BTreeSet;
use std::fmt;

use crate::character::abilities::{ability_modifiers, roll_abilities, AbilityScores};
use crate::character::derived::{level_one_attack_bonus, starting_money, DerivedStatsCalculator};
use crate::character::eligibility::EligibilityValidator;
use crate::character::selection::Selector;
use crate::character::sheet::{Character, CharacterParts};
use crate::core::error::{CharGenError, Result};
use crate::core::types::Ability;
use crate::dice::DiceRoller;
use crate::rules::constants::STARTING_LEVEL;
use crate::rules::tables::RuleTables;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    RollAbilities,
    SelectRace,
    SelectClass,
    ComputeDerived,
    Done,
}

/// Why the pipeline went back to rolling abilities
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartReason {
    NoEligibleRace,
    NoEligibleClass { race: String },
    /// The selector turned down every eligible option
    Declined { stage: GenerationStage },
}

impl fmt::Display for RestartReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartReason::NoEligibleRace => write!(f, "no race is eligible for these scores"),
            RestartReason::NoEligibleClass { race } => {
                write!(f, "no class is eligible for a {} with these scores", race)
            }
            RestartReason::Declined { stage } => write!(f, "selection declined at {:?}", stage),
        }
    }
}

/// Outcome of a stage: carry on with `T`, or roll again
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    Continue(T),
    Restart(RestartReason),
}

impl<T> Step<T> {
    pub fn is_restart(&self) -> bool {
        matches!(self, Step::Restart(_))
    }
}

/// Abilities rolled, races not yet chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolledAbilities {
    abilities: AbilityScores,
    eligible_races: BTreeSet<String>,
}

impl RolledAbilities {
    pub fn abilities(&self) -> &AbilityScores {
        &self.abilities
    }

    pub fn eligible_races(&self) -> &BTreeSet<String> {
        &self.eligible_races
    }
}

/// Race chosen, class not yet chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceSelected {
    abilities: AbilityScores,
    race: String,
    eligible_classes: BTreeSet<String>,
}

impl RaceSelected {
    pub fn abilities(&self) -> &AbilityScores {
        &self.abilities
    }

    pub fn race(&self) -> &str {
        &self.race
    }

    pub fn eligible_classes(&self) -> &BTreeSet<String> {
        &self.eligible_classes
    }
}

/// Race and class fixed up front, as in scripted use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub race: String,
    pub class_name: String,
    pub name: Option<String>,
}

impl GenerationRequest {
    pub fn new(race: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            race: race.into(),
            class_name: class_name.into(),
            name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CharacterFactory<'r> {
    rules: &'r RuleTables,
    validator: EligibilityValidator<'r>,
    calculator: DerivedStatsCalculator<'r>,
}

impl<'r> CharacterFactory<'r> {
    pub fn new(rules: &'r RuleTables) -> Self {
        Self {
            rules,
            validator: EligibilityValidator::new(rules),
            calculator: DerivedStatsCalculator::new(rules),
        }
    }

    pub fn rules(&self) -> &'r RuleTables {
        self.rules
    }

    pub fn validator(&self) -> &EligibilityValidator<'r> {
        &self.validator
    }

    pub fn calculator(&self) -> &DerivedStatsCalculator<'r> {
        &self.calculator
    }

    /// Generate a character for a fixed race and class
    ///
    /// Race and class are validated against the rolled abilities; any
    /// violation fails the request with every message collected.
    pub fn generate(
        &self,
        request: &GenerationRequest,
        dice: &mut impl DiceRoller,
    ) -> Result<Character> {
        let abilities = roll_abilities(dice)?;

        let violations = self.validator.validate_race(&abilities, &request.race);
        if !violations.is_empty() {
            tracing::debug!("Race {} rejected: {:?}", request.race, violations);
            return Err(CharGenError::Validation(violations));
        }

        let violations =
            self.validator
                .validate_class(&abilities, &request.race, &request.class_name);
        if !violations.is_empty() {
            tracing::debug!("Class {} rejected: {:?}", request.class_name, violations);
            return Err(CharGenError::Validation(violations));
        }

        self.compute_derived(
            abilities,
            &request.race,
            &request.class_name,
            request.name.clone(),
            dice,
        )
    }

    /// Stage 1: roll abilities and list eligible races
    pub fn roll_abilities(&self, dice: &mut impl DiceRoller) -> Result<Step<RolledAbilities>> {
        let abilities = roll_abilities(dice)?;
        let eligible_races = self.validator.valid_races_for_abilities(&abilities);

        if eligible_races.is_empty() {
            tracing::debug!("No eligible race for {:?}", abilities.to_array());
            return Ok(Step::Restart(RestartReason::NoEligibleRace));
        }

        Ok(Step::Continue(RolledAbilities {
            abilities,
            eligible_races,
        }))
    }

    /// Stage 2: fix the race and list eligible classes
    pub fn select_race(
        &self,
        rolled: &RolledAbilities,
        race: &str,
    ) -> Result<Step<RaceSelected>> {
        if !rolled.eligible_races.contains(race) {
            return Err(CharGenError::Validation(
                self.validator.validate_race(&rolled.abilities, race),
            ));
        }

        let eligible_classes = self
            .validator
            .valid_classes_for_race(&rolled.abilities, race);
        if eligible_classes.is_empty() {
            tracing::debug!("No eligible class for {}", race);
            return Ok(Step::Restart(RestartReason::NoEligibleClass {
                race: race.to_string(),
            }));
        }

        Ok(Step::Continue(RaceSelected {
            abilities: rolled.abilities,
            race: race.to_string(),
            eligible_classes,
        }))
    }

    /// Stage 3: fix the class and compute everything else
    pub fn select_class(
        &self,
        selected: &RaceSelected,
        class_name: &str,
        name: Option<String>,
        dice: &mut impl DiceRoller,
    ) -> Result<Character> {
        let violations =
            self.validator
                .validate_class(&selected.abilities, &selected.race, class_name);
        if !violations.is_empty() {
            return Err(CharGenError::Validation(violations));
        }

        self.compute_derived(selected.abilities, &selected.race, class_name, name, dice)
    }

    /// Drive all stages through a selector, rerolling on restart
    ///
    /// Gives up with `RerollsExhausted` after `max_attempts` rolls, or with
    /// `Aborted` if the selector refuses a reroll first. A limit of 0 still
    /// rolls once.
    pub fn generate_with(
        &self,
        selector: &mut impl Selector,
        name: Option<String>,
        dice: &mut impl DiceRoller,
        max_attempts: u32,
    ) -> Result<Character> {
        let max_attempts = max_attempts.max(1);
        for attempt in 1..=max_attempts {
            let reason = match self.attempt(selector, name.clone(), dice)? {
                Step::Continue(character) => return Ok(character),
                Step::Restart(reason) => reason,
            };

            tracing::debug!("Attempt {} restarting: {}", attempt, reason);

            if attempt < max_attempts && !selector.allow_reroll(&reason, attempt) {
                tracing::info!("Selector stopped generation after {} attempts", attempt);
                return Err(CharGenError::Aborted { attempts: attempt });
            }
        }

        tracing::warn!("Gave up after {} attempts", max_attempts);
        Err(CharGenError::RerollsExhausted {
            attempts: max_attempts,
        })
    }

    fn attempt(
        &self,
        selector: &mut impl Selector,
        name: Option<String>,
        dice: &mut impl DiceRoller,
    ) -> Result<Step<Character>> {
        let rolled = match self.roll_abilities(dice)? {
            Step::Continue(rolled) => rolled,
            Step::Restart(reason) => return Ok(Step::Restart(reason)),
        };

        let race = match selector.select_race(&rolled.abilities, &rolled.eligible_races) {
            Some(race) => race,
            None => {
                return Ok(Step::Restart(RestartReason::Declined {
                    stage: GenerationStage::SelectRace,
                }))
            }
        };

        let selected = match self.select_race(&rolled, &race)? {
            Step::Continue(selected) => selected,
            Step::Restart(reason) => return Ok(Step::Restart(reason)),
        };

        let class_name = match selector.select_class(
            &selected.abilities,
            &selected.race,
            &selected.eligible_classes,
        ) {
            Some(class_name) => class_name,
            None => {
                return Ok(Step::Restart(RestartReason::Declined {
                    stage: GenerationStage::SelectClass,
                }))
            }
        };

        self.select_class(&selected, &class_name, name, dice)
            .map(Step::Continue)
    }

    fn compute_derived(
        &self,
        abilities: AbilityScores,
        race: &str,
        class_name: &str,
        name: Option<String>,
        dice: &mut impl DiceRoller,
    ) -> Result<Character> {
        tracing::debug!("{:?}: {} {}", GenerationStage::ComputeDerived, race, class_name);

        let table = self.rules.ability_modifiers();
        let ability_mods = ability_modifiers(table, &abilities)?;
        let con_modifier = table.modifier(abilities.get(Ability::Constitution))?;
        let dex_modifier = table.modifier(abilities.get(Ability::Dexterity))?;

        let hp = self
            .calculator
            .roll_hit_points(class_name, race, con_modifier, dice)?;
        let ac = self.calculator.calculate_armor_class(dex_modifier)?;
        let attack_bonus = level_one_attack_bonus();
        let saving_throws = self.calculator.calculate_saving_throws(class_name, race)?;
        let money_gp = starting_money(dice);

        let character = Character::from_parts(CharacterParts {
            name,
            race: race.to_string(),
            class_name: class_name.to_string(),
            level: STARTING_LEVEL,
            abilities,
            ability_mods,
            hp,
            ac,
            attack_bonus,
            money_gp,
            saving_throws,
        });

        tracing::info!(
            "Generated level {} {} {} (HP {}, AC {}, {} gp)",
            character.level(),
            character.race(),
            character.class_name(),
            character.hp(),
            character.ac(),
            character.money_gp()
        );
        tracing::debug!("{:?}", GenerationStage::Done);

        Ok(character)
    }
}
