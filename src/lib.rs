//! RPG Characters - level 1 Basic Fantasy character generator

pub mod character;
pub mod core;
pub mod dice;
pub mod rules;
