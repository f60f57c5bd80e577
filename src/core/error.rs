use thiserror::Error;

use crate::core::types::EntityKind;

#[derive(Error, Debug)]
pub enum CharGenError {
    #[error("Unknown {kind}: {name}")]
    UnknownEntity { kind: EntityKind, name: String },

    #[error("Ability score {0} is outside the range [3, 18]")]
    OutOfRange(i32),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("No eligible race/class combination after {attempts} attempts")]
    RerollsExhausted { attempts: u32 },

    #[error("Character generation stopped by the selector after {attempts} attempts")]
    Aborted { attempts: u32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid rule tables: {0}")]
    InvalidRules(String),

    #[error("Rules parse error: {0}")]
    RulesParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl CharGenError {
    pub fn unknown(kind: EntityKind, name: impl Into<String>) -> Self {
        CharGenError::UnknownEntity {
            kind,
            name: name.into(),
        }
    }

    /// Violation messages carried by a validation failure, empty otherwise
    pub fn violations(&self) -> &[String] {
        match self {
            CharGenError::Validation(violations) => violations,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, CharGenError>;
