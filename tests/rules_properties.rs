//! Property tests for the rule formulas

use proptest::prelude::*;

use rpg_characters::character::{
    ability_modifier, roll_abilities, starting_money, AbilityScores, DerivedStatsCalculator,
    EligibilityValidator,
};
use rpg_characters::core::{Ability, CharGenError};
use rpg_characters::dice::{RandomDice, ScriptedDice};
use rpg_characters::rules::standard_rules;

fn expected_modifier(score: i32) -> i32 {
    match score {
        3 => -3,
        4..=5 => -2,
        6..=8 => -1,
        9..=12 => 0,
        13..=15 => 1,
        16..=17 => 2,
        _ => 3,
    }
}

proptest! {
    #[test]
    fn modifier_matches_table(score in 3i32..=18) {
        let rules = standard_rules().unwrap();
        prop_assert_eq!(
            ability_modifier(rules.ability_modifiers(), score).unwrap(),
            expected_modifier(score)
        );
    }

    #[test]
    fn modifier_fails_outside_range(score in prop_oneof![-50i32..3, 19i32..100]) {
        let rules = standard_rules().unwrap();
        let result = ability_modifier(rules.ability_modifiers(), score);
        prop_assert!(matches!(result, Err(CharGenError::OutOfRange(s)) if s == score));
    }

    #[test]
    fn rolled_abilities_in_range(seed in any::<u64>()) {
        let mut dice = RandomDice::seeded(seed);
        let abilities = roll_abilities(&mut dice).unwrap();
        for (_, score) in abilities.iter() {
            prop_assert!((3..=18).contains(&score));
        }
    }

    #[test]
    fn money_is_multiple_of_ten(seed in any::<u64>()) {
        let mut dice = RandomDice::seeded(seed);
        let gold = starting_money(&mut dice);
        prop_assert_eq!(gold % 10, 0);
        prop_assert!((30..=180).contains(&gold));
    }

    #[test]
    fn hit_points_at_least_one(
        roll in 1i32..=8,
        con_modifier in -20i32..=3,
        class_index in 0usize..4,
        race_index in 0usize..4,
    ) {
        let rules = standard_rules().unwrap();
        let calc = DerivedStatsCalculator::new(&rules);
        let class: Vec<&str> = rules.class_names().collect();
        let race: Vec<&str> = rules.race_names().collect();
        let mut dice = ScriptedDice::new([roll]);
        let hp = calc
            .roll_hit_points(class[class_index], race[race_index], con_modifier, &mut dice)
            .unwrap();
        prop_assert!(hp >= 1);
    }

    #[test]
    fn saving_throw_keys_match_class(class_index in 0usize..4, race_index in 0usize..4) {
        let rules = standard_rules().unwrap();
        let calc = DerivedStatsCalculator::new(&rules);
        let class_name = rules.class_names().nth(class_index).unwrap();
        let race_name = rules.race_names().nth(race_index).unwrap();

        let saves = calc.calculate_saving_throws(class_name, race_name).unwrap();
        let class = rules.class(class_name).unwrap();
        let race = rules.race(race_name).unwrap();

        prop_assert_eq!(saves.len(), class.saving_throws.len());
        for (category, base) in &class.saving_throws {
            prop_assert_eq!(saves[category], base + race.saving_throw_bonus(category));
        }
    }

    #[test]
    fn race_valid_iff_no_violations(scores in prop::array::uniform6(3i32..=18)) {
        let rules = standard_rules().unwrap();
        let validator = EligibilityValidator::new(&rules);
        let abilities = AbilityScores::from_array(scores).unwrap();

        for race in rules.races() {
            let within_limits = race
                .ability_min
                .iter()
                .all(|(ability, min)| abilities.get(*ability) >= *min)
                && race
                    .ability_max
                    .iter()
                    .all(|(ability, max)| abilities.get(*ability) <= *max);
            let violations = validator.validate_race(&abilities, &race.name);
            prop_assert_eq!(violations.is_empty(), within_limits);
        }
    }

    #[test]
    fn lowering_con_only_removes_dwarf(con in 3i32..9) {
        let rules = standard_rules().unwrap();
        let validator = EligibilityValidator::new(&rules);
        let abilities = AbilityScores::uniform(10)
            .unwrap()
            .with(Ability::Constitution, con)
            .unwrap();

        let races = validator.valid_races_for_abilities(&abilities);
        prop_assert!(!races.contains("dwarf"));
        prop_assert!(races.contains("elf"));
        prop_assert!(races.contains("halfling"));
        prop_assert!(races.contains("human"));
    }
}
