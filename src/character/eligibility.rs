//! Race and class eligibility checks
//!
//! Validation never fails hard: every check returns the full list of
//! violations it found, and an empty list means the candidate is allowed.
//! Callers decide whether to reject, reroll or ask again.

use std::collections::BTreeSet;

use crate::character::abilities::AbilityScores;
use crate::rules::tables::RuleTables;

/// Validates race and class choices against a rule set
#[derive(Debug, Clone, Copy)]
pub struct EligibilityValidator<'r> {
    rules: &'r RuleTables,
}

impl<'r> EligibilityValidator<'r> {
    pub fn new(rules: &'r RuleTables) -> Self {
        Self { rules }
    }

    /// Check racial ability floors and ceilings
    ///
    /// An unknown race yields a single violation and nothing else is checked.
    pub fn validate_race(&self, abilities: &AbilityScores, race_name: &str) -> Vec<String> {
        let race = match self.rules.race(race_name) {
            Some(race) => race,
            None => return vec![format!("Unknown race '{}'", race_name)],
        };

        let mut violations = Vec::new();

        for (&ability, &minimum) in &race.ability_min {
            let score = abilities.get(ability);
            if score < minimum {
                violations.push(format!(
                    "{} requires {} of at least {}, rolled {}",
                    race_name, ability, minimum, score
                ));
            }
        }

        for (&ability, &maximum) in &race.ability_max {
            let score = abilities.get(ability);
            if score > maximum {
                violations.push(format!(
                    "{} allows {} of at most {}, rolled {}",
                    race_name, ability, maximum, score
                ));
            }
        }

        violations
    }

    /// Check race/class compatibility and the class prime requisite
    ///
    /// Unknown race and unknown class are reported independently; the deeper
    /// checks only run when both are known.
    pub fn validate_class(
        &self,
        abilities: &AbilityScores,
        race_name: &str,
        class_name: &str,
    ) -> Vec<String> {
        let mut violations = Vec::new();

        let race = self.rules.race(race_name);
        if race.is_none() {
            violations.push(format!("Unknown race '{}'", race_name));
        }
        let class = self.rules.class(class_name);
        if class.is_none() {
            violations.push(format!("Unknown class '{}'", class_name));
        }

        if let (Some(race), Some(class)) = (race, class) {
            if !race.allows_class(class_name) {
                violations.push(format!("{} cannot be {}", race_name, class_name));
            }

            let score = abilities.get(class.prime_requisite);
            if score < class.min_prime {
                violations.push(format!(
                    "{} prime requisite {} too low: requires at least {}, rolled {}",
                    class_name, class.prime_requisite, class.min_prime, score
                ));
            }
        }

        violations
    }

    /// Every race whose ability limits these scores satisfy
    pub fn valid_races_for_abilities(&self, abilities: &AbilityScores) -> BTreeSet<String> {
        self.rules
            .race_names()
            .filter(|race| self.validate_race(abilities, race).is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Every class this race may take with these scores
    pub fn valid_classes_for_race(
        &self,
        abilities: &AbilityScores,
        race_name: &str,
    ) -> BTreeSet<String> {
        self.rules
            .class_names()
            .filter(|class| self.validate_class(abilities, race_name, class).is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Ability;
    use crate::rules::standard_rules;

    fn neutral() -> AbilityScores {
        AbilityScores::uniform(10).unwrap()
    }

    #[test]
    fn test_race_maximums() {
        let rules = standard_rules().unwrap();
        let validator = EligibilityValidator::new(&rules);
        for (race, ability) in [
            ("dwarf", Ability::Charisma),
            ("elf", Ability::Constitution),
            ("halfling", Ability::Strength),
        ] {
            let abilities = neutral().with(ability, 18).unwrap();
            let violations = validator.validate_race(&abilities, race);
            assert_eq!(violations.len(), 1, "{}: {:?}", race, violations);
            assert!(violations[0].contains(ability.name()));
            assert!(violations[0].contains("18"));
        }
    }

    #[test]
    fn test_race_minimums() {
        let rules = standard_rules().unwrap();
        let validator = EligibilityValidator::new(&rules);
        for (race, ability) in [
            ("dwarf", Ability::Constitution),
            ("elf", Ability::Intelligence),
            ("halfling", Ability::Dexterity),
        ] {
            let abilities = neutral().with(ability, 8).unwrap();
            let violations = validator.validate_race(&abilities, race);
            assert_eq!(violations.len(), 1, "{}: {:?}", race, violations);
            assert!(violations[0].contains(race));
            assert!(violations[0].contains("at least 9"));
        }
    }

    #[test]
    fn test_race_collects_every_violation() {
        let rules = standard_rules().unwrap();
        let validator = EligibilityValidator::new(&rules);
        let abilities = AbilityScores::new(18, 3, 10, 10, 10, 10).unwrap();
        let violations = validator.validate_race(&abilities, "halfling");
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().any(|v| v.contains("Strength")));
        assert!(violations.iter().any(|v| v.contains("Dexterity")));
    }

    #[test]
    fn test_unknown_race_short_circuits() {
        let rules = standard_rules().unwrap();
        let validator = EligibilityValidator::new(&rules);
        let violations = validator.validate_race(&neutral(), "orc");
        assert_eq!(violations, vec!["Unknown race 'orc'".to_string()]);
    }

    #[test]
    fn test_class_prime_requisites() {
        let rules = standard_rules().unwrap();
        let validator = EligibilityValidator::new(&rules);
        for (class, ability) in [
            ("cleric", Ability::Wisdom),
            ("fighter", Ability::Strength),
            ("magic-user", Ability::Intelligence),
            ("thief", Ability::Dexterity),
        ] {
            let abilities = neutral().with(ability, 8).unwrap();
            let violations = validator.validate_class(&abilities, "human", class);
            assert_eq!(violations.len(), 1, "{}: {:?}", class, violations);
            assert!(violations[0].contains("too low"));
            assert!(validator.validate_class(&neutral(), "human", class).is_empty());
        }
    }

    #[test]
    fn test_disallowed_combination() {
        let rules = standard_rules().unwrap();
        let validator = EligibilityValidator::new(&rules);
        let abilities = AbilityScores::uniform(12).unwrap();
        let violations = validator.validate_class(&abilities, "halfling", "magic-user");
        assert_eq!(violations, vec!["halfling cannot be magic-user".to_string()]);
    }

    #[test]
    fn test_disallowed_combination_and_low_prime_both_reported() {
        let rules = standard_rules().unwrap();
        let validator = EligibilityValidator::new(&rules);
        let abilities = neutral().with(Ability::Intelligence, 3).unwrap();
        let violations = validator.validate_class(&abilities, "dwarf", "magic-user");
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_unknown_race_and_class_both_reported() {
        let rules = standard_rules().unwrap();
        let validator = EligibilityValidator::new(&rules);
        let violations = validator.validate_class(&neutral(), "orc", "bard");
        assert_eq!(
            violations,
            vec![
                "Unknown race 'orc'".to_string(),
                "Unknown class 'bard'".to_string()
            ]
        );
    }

    #[test]
    fn test_unknown_class_with_known_race() {
        let rules = standard_rules().unwrap();
        let validator = EligibilityValidator::new(&rules);
        let violations = validator.validate_class(&neutral(), "elf", "bard");
        assert_eq!(violations, vec!["Unknown class 'bard'".to_string()]);
    }

    #[test]
    fn test_valid_races_neutral_and_low_con() {
        let rules = standard_rules().unwrap();
        let validator = EligibilityValidator::new(&rules);
        let all: BTreeSet<String> = rules.race_names().map(str::to_string).collect();
        assert_eq!(validator.valid_races_for_abilities(&neutral()), all);

        let low_con = neutral().with(Ability::Constitution, 8).unwrap();
        let races = validator.valid_races_for_abilities(&low_con);
        assert!(!races.contains("dwarf"));
        assert_eq!(races.len(), all.len() - 1);
    }

    #[test]
    fn test_valid_classes_for_race() {
        let rules = standard_rules().unwrap();
        let validator = EligibilityValidator::new(&rules);

        let dwarf = validator.valid_classes_for_race(&neutral(), "dwarf");
        let expected: BTreeSet<String> = ["cleric", "fighter", "thief"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(dwarf, expected);

        let weak = neutral().with(Ability::Strength, 5).unwrap();
        assert!(!validator
            .valid_classes_for_race(&weak, "human")
            .contains("fighter"));

        assert!(validator.valid_classes_for_race(&neutral(), "orc").is_empty());
    }
}
