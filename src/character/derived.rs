//! Derived statistics: hit points, armor class, attack bonus, saves, gold
//!
//! These stages run after validation, so an unknown race, class, armor or
//! shield here is a contract violation and fails with `UnknownEntity`.

use std::collections::BTreeMap;

use crate::core::error::Result;
use crate::dice::{DiceExpression, DiceRoller};
use crate::rules::constants::{
    LEVEL_ONE_ATTACK_BONUS, MIN_HIT_POINTS, STARTING_MONEY_MULTIPLIER, STARTING_MONEY_ROLL,
    UNARMORED,
};
use crate::rules::tables::RuleTables;

#[derive(Debug, Clone, Copy)]
pub struct DerivedStatsCalculator<'r> {
    rules: &'r RuleTables,
}

impl<'r> DerivedStatsCalculator<'r> {
    pub fn new(rules: &'r RuleTables) -> Self {
        Self { rules }
    }

    /// Hit die a race/class pairing rolls at level 1
    pub fn hit_die(&self, class_name: &str, race_name: &str) -> Result<DiceExpression> {
        let class = self.rules.require_class(class_name)?;
        let race = self.rules.require_race(race_name)?;
        Ok(DiceExpression::d(race.effective_hit_die(class.hit_die)))
    }

    /// Roll level-1 hit points
    ///
    /// One hit die (capped by race), plus the Constitution modifier and any
    /// racial adjustment, never less than 1.
    pub fn roll_hit_points(
        &self,
        class_name: &str,
        race_name: &str,
        con_modifier: i32,
        dice: &mut impl DiceRoller,
    ) -> Result<i32> {
        let die = self.hit_die(class_name, race_name)?;
        let adjustment = self.rules.require_race(race_name)?.hit_point_adjustment;

        let rolled = dice.roll(die);
        let hp = rolled
            .saturating_add(con_modifier)
            .saturating_add(adjustment)
            .max(MIN_HIT_POINTS);
        tracing::debug!(
            "HP for {} {}: {} rolled {}, CON {:+}, racial {:+} -> {}",
            race_name,
            class_name,
            die,
            rolled,
            con_modifier,
            adjustment,
            hp
        );
        Ok(hp)
    }

    /// Unarmored AC: table base plus the Dexterity modifier, unclamped
    pub fn calculate_armor_class(&self, dex_modifier: i32) -> Result<i32> {
        self.armor_class_for(UNARMORED, dex_modifier)
    }

    pub fn armor_class_for(&self, armor_name: &str, dex_modifier: i32) -> Result<i32> {
        self.armor_class_with(armor_name, None, dex_modifier)
    }

    /// Armor base, plus the shield bonus if one is carried, plus Dexterity
    pub fn armor_class_with(
        &self,
        armor_name: &str,
        shield_name: Option<&str>,
        dex_modifier: i32,
    ) -> Result<i32> {
        let base_ac = self.rules.require_armor(armor_name)?.base_ac;
        let shield_bonus = match shield_name {
            Some(name) => self.rules.require_shield(name)?.ac_bonus,
            None => 0,
        };
        Ok(base_ac
            .saturating_add(shield_bonus)
            .saturating_add(dex_modifier))
    }

    /// Class base saves plus racial bonuses, keyed exactly as the class table
    pub fn calculate_saving_throws(
        &self,
        class_name: &str,
        race_name: &str,
    ) -> Result<BTreeMap<String, i32>> {
        let class = self.rules.require_class(class_name)?;
        let race = self.rules.require_race(race_name)?;

        Ok(class
            .saving_throws
            .iter()
            .map(|(category, base)| {
                (category.clone(), base + race.saving_throw_bonus(category))
            })
            .collect())
    }
}

/// Same for every class and race at level 1
pub fn level_one_attack_bonus() -> i32 {
    LEVEL_ONE_ATTACK_BONUS
}

/// 3d6 x 10 gold pieces
pub fn starting_money(dice: &mut impl DiceRoller) -> i32 {
    dice.roll(STARTING_MONEY_ROLL) * STARTING_MONEY_MULTIPLIER
}
