//! Load rule tables from TOML

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::core::error::Result;
use crate::rules::tables::{
    AbilityModifierTable, ArmorDefinition, ClassDefinition, ModifierBand, RaceDefinition,
    RuleTables, ShieldDefinition,
};

/// Basic Fantasy tables shipped with the crate
const STANDARD_RULES: &str = include_str!("../../data/rules/basic_fantasy.toml");

#[derive(Debug, Deserialize)]
struct RulesFile {
    ability_modifiers: Vec<ModifierBand>,
    #[serde(default)]
    classes: BTreeMap<String, ClassDefinition>,
    #[serde(default)]
    races: BTreeMap<String, RaceDefinition>,
    #[serde(default)]
    armor: BTreeMap<String, ArmorDefinition>,
    #[serde(default)]
    shields: BTreeMap<String, ShieldDefinition>,
}

/// The embedded standard rule set
pub fn standard_rules() -> Result<RuleTables> {
    parse_rules(STANDARD_RULES)
}

/// Load a rule set from a TOML file
pub fn load_rules(path: &Path) -> Result<RuleTables> {
    let content = fs::read_to_string(path)?;
    let rules = parse_rules(&content)?;
    tracing::info!(
        "Loaded rule tables from {} ({} races, {} classes)",
        path.display(),
        rules.race_names().count(),
        rules.class_names().count()
    );
    Ok(rules)
}

/// Parse and check a rule set from TOML text
pub fn parse_rules(content: &str) -> Result<RuleTables> {
    let file: RulesFile = toml::from_str(content)?;

    let ability_modifiers = AbilityModifierTable::new(file.ability_modifiers)?;

    let classes = file
        .classes
        .into_iter()
        .map(|(name, mut class)| {
            class.name = name.clone();
            (name, class)
        })
        .collect();

    let races = file
        .races
        .into_iter()
        .map(|(name, mut race)| {
            race.name = name.clone();
            (name, race)
        })
        .collect();

    RuleTables::new(ability_modifiers, classes, races, file.armor, file.shields)
}
