//! The finished character record, its text sheet and JSON export

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::character::abilities::AbilityScores;
use crate::core::error::Result;
use crate::core::types::Ability;

/// A generated level-1 character
///
/// Only the factory builds these; every field is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    name: Option<String>,
    race: String,
    #[serde(rename = "class")]
    class_name: String,
    level: u32,
    abilities: AbilityScores,
    ability_mods: BTreeMap<Ability, i32>,
    hp: i32,
    ac: i32,
    attack_bonus: i32,
    money_gp: i32,
    saving_throws: BTreeMap<String, i32>,
    inventory: Vec<String>,
}

/// Field values handed over by the factory
pub(crate) struct CharacterParts {
    pub name: Option<String>,
    pub race: String,
    pub class_name: String,
    pub level: u32,
    pub abilities: AbilityScores,
    pub ability_mods: BTreeMap<Ability, i32>,
    pub hp: i32,
    pub ac: i32,
    pub attack_bonus: i32,
    pub money_gp: i32,
    pub saving_throws: BTreeMap<String, i32>,
}

impl Character {
    pub(crate) fn from_parts(parts: CharacterParts) -> Self {
        Self {
            name: parts.name,
            race: parts.race,
            class_name: parts.class_name,
            level: parts.level,
            abilities: parts.abilities,
            ability_mods: parts.ability_mods,
            hp: parts.hp,
            ac: parts.ac,
            attack_bonus: parts.attack_bonus,
            money_gp: parts.money_gp,
            saving_throws: parts.saving_throws,
            inventory: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn race(&self) -> &str {
        &self.race
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn abilities(&self) -> &AbilityScores {
        &self.abilities
    }

    pub fn ability_mods(&self) -> &BTreeMap<Ability, i32> {
        &self.ability_mods
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn ac(&self) -> i32 {
        self.ac
    }

    pub fn attack_bonus(&self) -> i32 {
        self.attack_bonus
    }

    pub fn money_gp(&self) -> i32 {
        self.money_gp
    }

    pub fn saving_throws(&self) -> &BTreeMap<String, i32> {
        &self.saving_throws
    }

    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the character as pretty-printed JSON
    pub fn save_json(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        tracing::info!("Saved character to {}", path.display());
        Ok(())
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.name.as_deref().unwrap_or("Unnamed adventurer"))?;
        writeln!(
            f,
            "Level {} {} {}",
            self.level, self.race, self.class_name
        )?;
        writeln!(f)?;

        for (ability, score) in self.abilities.iter() {
            let modifier = self.ability_mods.get(&ability).copied().unwrap_or(0);
            writeln!(f, "  {}  {:>2}  ({:+})", ability.abbreviation(), score, modifier)?;
        }
        writeln!(f)?;

        writeln!(f, "  HP {}   AC {}   Attack {:+}", self.hp, self.ac, self.attack_bonus)?;
        writeln!(f)?;

        writeln!(f, "Saving throws:")?;
        for (category, target) in &self.saving_throws {
            writeln!(f, "  {:<22} {}", category.replace('_', " "), target)?;
        }
        writeln!(f)?;

        write!(f, "Gold: {} gp", self.money_gp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Character {
        let abilities = AbilityScores::uniform(10).unwrap();
        let ability_mods = Ability::ALL.into_iter().map(|a| (a, 0)).collect();
        let mut saving_throws = BTreeMap::new();
        saving_throws.insert("spells".to_string(), 17);
        Character::from_parts(CharacterParts {
            name: Some("Brom".into()),
            race: "human".into(),
            class_name: "fighter".into(),
            level: 1,
            abilities,
            ability_mods,
            hp: 4,
            ac: 11,
            attack_bonus: 1,
            money_gp: 90,
            saving_throws,
        })
    }

    #[test]
    fn test_json_field_names() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(json["name"], "Brom");
        assert_eq!(json["race"], "human");
        assert_eq!(json["class"], "fighter");
        assert_eq!(json["level"], 1);
        assert_eq!(json["abilities"]["STR"], 10);
        assert_eq!(json["ability_mods"]["CHA"], 0);
        assert_eq!(json["hp"], 4);
        assert_eq!(json["ac"], 11);
        assert_eq!(json["attack_bonus"], 1);
        assert_eq!(json["money_gp"], 90);
        assert_eq!(json["saving_throws"]["spells"], 17);
        assert_eq!(json["inventory"], serde_json::json!([]));
    }

    #[test]
    fn test_unnamed_serializes_null() {
        let mut character = sample();
        character.name = None;
        let json = serde_json::to_value(&character).unwrap();
        assert!(json["name"].is_null());
    }

    #[test]
    fn test_sheet_text() {
        let text = sample().to_string();
        assert!(text.starts_with("=== Brom ==="));
        assert!(text.contains("Level 1 human fighter"));
        assert!(text.contains("STR  10  (+0)"));
        assert!(text.contains("HP 4   AC 11   Attack +1"));
        assert!(text.contains("Gold: 90 gp"));
    }

    #[test]
    fn test_save_json_writes_file() {
        let path = std::env::temp_dir().join(format!("rpg_characters_sheet_{}.json", std::process::id()));
        sample().save_json(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"money_gp\": 90"));
        let _ = fs::remove_file(&path);
    }
}
