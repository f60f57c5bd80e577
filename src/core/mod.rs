pub mod config;
pub mod error;
pub mod types;

pub use config::GeneratorConfig;
pub use error::{CharGenError, Result};
pub use types::{Ability, EntityKind};
