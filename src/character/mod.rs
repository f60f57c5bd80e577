//! Level-1 character generation
//!
//! Abilities are rolled first, then race and class are checked against the
//! rule tables, then the derived statistics are computed. The factory ties
//! the stages together.

pub mod abilities;
pub mod derived;
pub mod eligibility;
pub mod factory;
pub mod selection;
pub mod sheet;

pub use abilities::{ability_modifier, ability_modifiers, roll_abilities, AbilityScores};
pub use derived::{level_one_attack_bonus, starting_money, DerivedStatsCalculator};
pub use eligibility::EligibilityValidator;
pub use factory::{
    CharacterFactory, GenerationRequest, GenerationStage, RaceSelected, RestartReason,
    RolledAbilities, Step,
};
pub use selection::{FirstEligible, RandomSelector, Selector};
pub use sheet::Character;
