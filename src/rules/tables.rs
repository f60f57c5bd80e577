//! Rule table definitions: ability modifiers, classes, races, armor and shields
//!
//! A [`RuleTables`] value is built once by the loader and then only read.
//! Every component that needs rule data receives it by shared reference.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::error::{CharGenError, Result};
use crate::core::types::{Ability, EntityKind};
use crate::rules::constants::{
    MAX_ABILITY_SCORE, MAX_HIT_DIE, MAX_HIT_POINT_ADJUSTMENT, MIN_ABILITY_SCORE, UNARMORED,
};

/// Inclusive score range mapped to a modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierBand {
    pub min: i32,
    pub max: i32,
    pub modifier: i32,
}

impl ModifierBand {
    pub fn contains(&self, score: i32) -> bool {
        score >= self.min && score <= self.max
    }
}

/// Ordered, gap-free bands covering exactly [3, 18]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityModifierTable {
    bands: Vec<ModifierBand>,
}

impl AbilityModifierTable {
    /// Build a table, rejecting gaps, overlaps and bands outside [3, 18]
    pub fn new(mut bands: Vec<ModifierBand>) -> Result<Self> {
        bands.sort_by_key(|b| b.min);

        let score_range = MIN_ABILITY_SCORE..=MAX_ABILITY_SCORE;
        let mut expected = MIN_ABILITY_SCORE;
        for band in &bands {
            if !score_range.contains(&band.min) || !score_range.contains(&band.max) {
                return Err(CharGenError::InvalidRules(format!(
                    "modifier band {}..={} is outside [{}, {}]",
                    band.min, band.max, MIN_ABILITY_SCORE, MAX_ABILITY_SCORE
                )));
            }
            if band.min > band.max {
                return Err(CharGenError::InvalidRules(format!(
                    "modifier band {}..={} is empty",
                    band.min, band.max
                )));
            }
            if band.min != expected {
                return Err(CharGenError::InvalidRules(format!(
                    "modifier bands must be contiguous: expected a band starting at {}, found {}",
                    expected, band.min
                )));
            }
            expected = band.max + 1;
        }

        if expected != MAX_ABILITY_SCORE + 1 {
            return Err(CharGenError::InvalidRules(format!(
                "modifier bands must end at {}, last covered score is {}",
                MAX_ABILITY_SCORE,
                expected - 1
            )));
        }

        Ok(Self { bands })
    }

    pub fn modifier(&self, score: i32) -> Result<i32> {
        self.bands
            .iter()
            .find(|band| band.contains(score))
            .map(|band| band.modifier)
            .ok_or(CharGenError::OutOfRange(score))
    }

    pub fn bands(&self) -> &[ModifierBand] {
        &self.bands
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDefinition {
    /// Filled from the table key by the loader
    #[serde(skip)]
    pub name: String,
    pub prime_requisite: Ability,
    pub min_prime: i32,
    pub hit_die: u32,
    /// Saving-throw category to target number
    pub saving_throws: BTreeMap<String, i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceDefinition {
    /// Filled from the table key by the loader
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub ability_min: BTreeMap<Ability, i32>,
    #[serde(default)]
    pub ability_max: BTreeMap<Ability, i32>,
    pub allowed_classes: BTreeSet<String>,
    #[serde(default)]
    pub saving_throw_bonuses: BTreeMap<String, i32>,
    /// Largest hit die this race may roll, regardless of class
    #[serde(default)]
    pub max_hit_die: Option<u32>,
    /// Flat adjustment applied to level-1 hit points
    #[serde(default)]
    pub hit_point_adjustment: i32,
}

impl RaceDefinition {
    pub fn allows_class(&self, class_name: &str) -> bool {
        self.allowed_classes.contains(class_name)
    }

    pub fn saving_throw_bonus(&self, category: &str) -> i32 {
        self.saving_throw_bonuses.get(category).copied().unwrap_or(0)
    }

    /// Class hit die after the racial cap
    pub fn effective_hit_die(&self, class_hit_die: u32) -> u32 {
        match self.max_hit_die {
            Some(cap) => class_hit_die.min(cap),
            None => class_hit_die,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmorType {
    None,
    Light,
    Metal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorDefinition {
    pub base_ac: i32,
    pub weight: u32,
    pub cost_gp: u32,
    #[serde(rename = "type")]
    pub kind: ArmorType,
}

/// Carried shield, added on top of the armor's base AC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldDefinition {
    pub ac_bonus: i32,
    pub weight: u32,
    pub cost_gp: u32,
}

/// Complete rule set for character generation
#[derive(Debug, Clone)]
pub struct RuleTables {
    ability_modifiers: AbilityModifierTable,
    classes: BTreeMap<String, ClassDefinition>,
    races: BTreeMap<String, RaceDefinition>,
    armor: BTreeMap<String, ArmorDefinition>,
    shields: BTreeMap<String, ShieldDefinition>,
}

impl RuleTables {
    /// Assemble a rule set, checking cross-table consistency
    pub fn new(
        ability_modifiers: AbilityModifierTable,
        classes: BTreeMap<String, ClassDefinition>,
        races: BTreeMap<String, RaceDefinition>,
        armor: BTreeMap<String, ArmorDefinition>,
        shields: BTreeMap<String, ShieldDefinition>,
    ) -> Result<Self> {
        let tables = Self {
            ability_modifiers,
            classes,
            races,
            armor,
            shields,
        };
        tables.check_integrity()?;
        Ok(tables)
    }

    fn check_integrity(&self) -> Result<()> {
        let score_range = MIN_ABILITY_SCORE..=MAX_ABILITY_SCORE;
        let adjustment_range = -MAX_HIT_POINT_ADJUSTMENT..=MAX_HIT_POINT_ADJUSTMENT;

        for (name, class) in &self.classes {
            if class.hit_die == 0 || class.hit_die > MAX_HIT_DIE {
                return Err(CharGenError::InvalidRules(format!(
                    "class '{}' hit die d{} is outside [1, {}]",
                    name, class.hit_die, MAX_HIT_DIE
                )));
            }
            if !score_range.contains(&class.min_prime) {
                return Err(CharGenError::InvalidRules(format!(
                    "class '{}' minimum prime requisite {} is outside [3, 18]",
                    name, class.min_prime
                )));
            }
        }

        for (name, race) in &self.races {
            for (ability, limit) in race.ability_min.iter().chain(race.ability_max.iter()) {
                if !score_range.contains(limit) {
                    return Err(CharGenError::InvalidRules(format!(
                        "race '{}' {} limit {} is outside [3, 18]",
                        name,
                        ability.abbreviation(),
                        limit
                    )));
                }
            }
            if let Some(unknown) = race
                .allowed_classes
                .iter()
                .find(|class| !self.classes.contains_key(*class))
            {
                return Err(CharGenError::InvalidRules(format!(
                    "race '{}' allows unknown class '{}'",
                    name, unknown
                )));
            }
            if let Some(cap) = race
                .max_hit_die
                .filter(|cap| *cap == 0 || *cap > MAX_HIT_DIE)
            {
                return Err(CharGenError::InvalidRules(format!(
                    "race '{}' hit die cap d{} is outside [1, {}]",
                    name, cap, MAX_HIT_DIE
                )));
            }
            if !adjustment_range.contains(&race.hit_point_adjustment) {
                return Err(CharGenError::InvalidRules(format!(
                    "race '{}' hit point adjustment {} is outside [{}, {}]",
                    name,
                    race.hit_point_adjustment,
                    -MAX_HIT_POINT_ADJUSTMENT,
                    MAX_HIT_POINT_ADJUSTMENT
                )));
            }
        }

        if !self.armor.contains_key(UNARMORED) {
            return Err(CharGenError::InvalidRules(format!(
                "armor table has no '{}' entry",
                UNARMORED
            )));
        }

        Ok(())
    }

    pub fn ability_modifiers(&self) -> &AbilityModifierTable {
        &self.ability_modifiers
    }

    pub fn race(&self, name: &str) -> Option<&RaceDefinition> {
        self.races.get(name)
    }

    pub fn class(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes.get(name)
    }

    pub fn armor(&self, name: &str) -> Option<&ArmorDefinition> {
        self.armor.get(name)
    }

    pub fn shield(&self, name: &str) -> Option<&ShieldDefinition> {
        self.shields.get(name)
    }

    /// Race lookup for stages that run after validation
    pub fn require_race(&self, name: &str) -> Result<&RaceDefinition> {
        self.race(name)
            .ok_or_else(|| CharGenError::unknown(EntityKind::Race, name))
    }

    /// Class lookup for stages that run after validation
    pub fn require_class(&self, name: &str) -> Result<&ClassDefinition> {
        self.class(name)
            .ok_or_else(|| CharGenError::unknown(EntityKind::Class, name))
    }

    pub fn require_armor(&self, name: &str) -> Result<&ArmorDefinition> {
        self.armor(name)
            .ok_or_else(|| CharGenError::unknown(EntityKind::Armor, name))
    }

    pub fn require_shield(&self, name: &str) -> Result<&ShieldDefinition> {
        self.shield(name)
            .ok_or_else(|| CharGenError::unknown(EntityKind::Shield, name))
    }

    pub fn races(&self) -> impl Iterator<Item = &RaceDefinition> {
        self.races.values()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.classes.values()
    }

    pub fn race_names(&self) -> impl Iterator<Item = &str> {
        self.races.keys().map(String::as_str)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(min: i32, max: i32, modifier: i32) -> ModifierBand {
        ModifierBand { min, max, modifier }
    }

    fn two_band_table() -> AbilityModifierTable {
        AbilityModifierTable::new(vec![band(11, 18, 1), band(3, 10, 0)]).unwrap()
    }

    #[test]
    fn test_table_sorts_bands() {
        let table = two_band_table();
        assert_eq!(table.bands()[0].min, 3);
        assert_eq!(table.modifier(3).unwrap(), 0);
        assert_eq!(table.modifier(18).unwrap(), 1);
    }

    #[test]
    fn test_table_rejects_gap() {
        let result = AbilityModifierTable::new(vec![band(3, 9, 0), band(11, 18, 1)]);
        assert!(matches!(result, Err(CharGenError::InvalidRules(_))));
    }

    #[test]
    fn test_table_rejects_overlap() {
        let result = AbilityModifierTable::new(vec![band(3, 10, 0), band(10, 18, 1)]);
        assert!(matches!(result, Err(CharGenError::InvalidRules(_))));
    }

    #[test]
    fn test_table_rejects_short_coverage() {
        let result = AbilityModifierTable::new(vec![band(3, 17, 0)]);
        assert!(matches!(result, Err(CharGenError::InvalidRules(_))));
    }

    #[test]
    fn test_table_rejects_band_beyond_score_range() {
        let result = AbilityModifierTable::new(vec![band(3, i32::MAX, 0)]);
        assert!(matches!(result, Err(CharGenError::InvalidRules(msg)) if msg.contains("outside")));

        let result = AbilityModifierTable::new(vec![band(i32::MIN, 18, 0)]);
        assert!(matches!(result, Err(CharGenError::InvalidRules(_))));
    }

    #[test]
    fn test_lookup_outside_range_fails() {
        let table = two_band_table();
        assert!(matches!(table.modifier(2), Err(CharGenError::OutOfRange(2))));
        assert!(matches!(table.modifier(19), Err(CharGenError::OutOfRange(19))));
    }

    #[test]
    fn test_effective_hit_die_takes_smaller() {
        let race = RaceDefinition {
            name: "elf".into(),
            ability_min: BTreeMap::new(),
            ability_max: BTreeMap::new(),
            allowed_classes: BTreeSet::new(),
            saving_throw_bonuses: BTreeMap::new(),
            max_hit_die: Some(6),
            hit_point_adjustment: 0,
        };
        assert_eq!(race.effective_hit_die(8), 6);
        assert_eq!(race.effective_hit_die(4), 4);
    }

    #[test]
    fn test_rule_tables_require_unarmored_entry() {
        let result = RuleTables::new(
            two_band_table(),
            BTreeMap::new(),
            BTreeMap::new(),
            BTreeMap::new(),
            BTreeMap::new(),
        );
        assert!(matches!(result, Err(CharGenError::InvalidRules(_))));
    }

    #[test]
    fn test_require_lookups_report_kind() {
        let mut armor = BTreeMap::new();
        armor.insert(
            "none".to_string(),
            ArmorDefinition {
                base_ac: 11,
                weight: 0,
                cost_gp: 0,
                kind: ArmorType::None,
            },
        );
        let tables = RuleTables::new(
            two_band_table(),
            BTreeMap::new(),
            BTreeMap::new(),
            armor,
            BTreeMap::new(),
        )
        .unwrap();

        match tables.require_race("orc") {
            Err(CharGenError::UnknownEntity { kind, name }) => {
                assert_eq!(kind, EntityKind::Race);
                assert_eq!(name, "orc");
            }
            other => panic!("Expected UnknownEntity, got {:?}", other),
        }
        assert!(tables.require_class("bard").is_err());
        assert_eq!(tables.require_armor("none").unwrap().base_ac, 11);
        assert!(matches!(
            tables.require_shield("tower"),
            Err(CharGenError::UnknownEntity {
                kind: EntityKind::Shield,
                ..
            })
        ));
    }
}
