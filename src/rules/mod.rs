//! Race, class, armor and shield rules loaded from TOML

pub mod constants;
pub mod tables;
mod loader;

pub use loader::{load_rules, parse_rules, standard_rules};
pub use tables::{
    AbilityModifierTable, ArmorDefinition, ArmorType, ClassDefinition, ModifierBand,
    RaceDefinition, RuleTables, ShieldDefinition,
};
