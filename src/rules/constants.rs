//! Fixed level-1 generation constants
//!
//! Everything that varies between rule sets lives in the TOML tables. These
//! values are the same for every table.

use crate::dice::DiceExpression;

pub const MIN_ABILITY_SCORE: i32 = 3;
pub const MAX_ABILITY_SCORE: i32 = 18;

/// One roll per ability
pub const ABILITY_ROLL: DiceExpression = DiceExpression::new(3, 6);

/// Starting gold is this roll times `STARTING_MONEY_MULTIPLIER`
pub const STARTING_MONEY_ROLL: DiceExpression = DiceExpression::new(3, 6);
pub const STARTING_MONEY_MULTIPLIER: i32 = 10;

pub const STARTING_LEVEL: u32 = 1;
pub const LEVEL_ONE_ATTACK_BONUS: i32 = 1;
pub const MIN_HIT_POINTS: i32 = 1;

/// Largest hit die a rule file may give a class or race cap
pub const MAX_HIT_DIE: u32 = 100;
/// Bound on the magnitude of a racial hit-point adjustment
pub const MAX_HIT_POINT_ADJUSTMENT: i32 = 100;

/// Armor table entry used for characters with no armor
pub const UNARMORED: &str = "none";
