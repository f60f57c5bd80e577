//! Ability scores: rolling and modifier lookup

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::error::{CharGenError, Result};
use crate::core::types::Ability;
use crate::dice::DiceRoller;
use crate::rules::constants::{ABILITY_ROLL, MAX_ABILITY_SCORE, MIN_ABILITY_SCORE};
use crate::rules::tables::AbilityModifierTable;

/// Six ability scores, each in [3, 18]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbilityScores {
    #[serde(rename = "STR")]
    strength: i32,
    #[serde(rename = "DEX")]
    dexterity: i32,
    #[serde(rename = "CON")]
    constitution: i32,
    #[serde(rename = "INT")]
    intelligence: i32,
    #[serde(rename = "WIS")]
    wisdom: i32,
    #[serde(rename = "CHA")]
    charisma: i32,
}

impl AbilityScores {
    /// Scores in roll order: STR, DEX, CON, INT, WIS, CHA
    pub fn new(
        strength: i32,
        dexterity: i32,
        constitution: i32,
        intelligence: i32,
        wisdom: i32,
        charisma: i32,
    ) -> Result<Self> {
        Self::from_array([strength, dexterity, constitution, intelligence, wisdom, charisma])
    }

    /// Scores in [`Ability::ALL`] order
    pub fn from_array(scores: [i32; 6]) -> Result<Self> {
        if let Some(&bad) = scores
            .iter()
            .find(|s| !(MIN_ABILITY_SCORE..=MAX_ABILITY_SCORE).contains(*s))
        {
            return Err(CharGenError::OutOfRange(bad));
        }
        let [strength, dexterity, constitution, intelligence, wisdom, charisma] = scores;
        Ok(Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        })
    }

    /// Every ability at the same score
    pub fn uniform(score: i32) -> Result<Self> {
        Self::from_array([score; 6])
    }

    /// Copy with one score replaced
    pub fn with(&self, ability: Ability, score: i32) -> Result<Self> {
        let mut scores = self.to_array();
        let index = Ability::ALL
            .iter()
            .position(|a| *a == ability)
            .unwrap_or_default();
        scores[index] = score;
        Self::from_array(scores)
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn to_array(&self) -> [i32; 6] {
        Ability::ALL.map(|a| self.get(a))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, i32)> + '_ {
        Ability::ALL.into_iter().map(|a| (a, self.get(a)))
    }
}

/// Roll 3d6 for each ability in STR, DEX, CON, INT, WIS, CHA order
pub fn roll_abilities(dice: &mut impl DiceRoller) -> Result<AbilityScores> {
    let scores = Ability::ALL.map(|_| dice.roll(ABILITY_ROLL));
    tracing::debug!("Rolled abilities {:?}", scores);
    AbilityScores::from_array(scores)
}

/// Bonus or penalty for a single score
pub fn ability_modifier(table: &AbilityModifierTable, score: i32) -> Result<i32> {
    table.modifier(score)
}

/// Modifier for every ability; never partial
pub fn ability_modifiers(
    table: &AbilityModifierTable,
    abilities: &AbilityScores,
) -> Result<BTreeMap<Ability, i32>> {
    abilities
        .iter()
        .map(|(ability, score)| Ok((ability, table.modifier(score)?)))
        .collect()
}
