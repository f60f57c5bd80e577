//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six ability scores, in roll order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Ability {
    #[serde(rename = "STR")]
    Strength,
    #[serde(rename = "DEX")]
    Dexterity,
    #[serde(rename = "CON")]
    Constitution,
    #[serde(rename = "INT")]
    Intelligence,
    #[serde(rename = "WIS")]
    Wisdom,
    #[serde(rename = "CHA")]
    Charisma,
}

impl Ability {
    /// Roll order: STR, DEX, CON, INT, WIS, CHA
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.abbreviation())
    }
}

impl FromStr for Ability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ability::ALL
            .into_iter()
            .find(|a| {
                a.abbreviation().eq_ignore_ascii_case(s) || a.name().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| format!("Unknown ability '{}'", s))
    }
}

impl TryFrom<String> for Ability {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Kind of rule-table entry a lookup failed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Race,
    Class,
    Armor,
    Shield,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Race => "race",
            EntityKind::Class => "class",
            EntityKind::Armor => "armor",
            EntityKind::Shield => "shield",
        };
        f.write_str(label)
    }
}
