//! Generator configuration with documented defaults

use std::path::PathBuf;

/// Configuration for a generation run
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Upper bound on ability rerolls for non-interactive drivers
    ///
    /// A narrow rule set can make every roll ineligible, so the restart
    /// loop must stop somewhere. With the standard tables a human is
    /// always eligible and the loop rarely needs more than one pass.
    pub max_rerolls: u32,

    /// Rule tables to load instead of the embedded standard set
    pub rules_path: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_rerolls: 100,
            rules_path: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.max_rerolls == 0 {
            return Err("max_rerolls must be at least 1".into());
        }

        if let Some(path) = &self.rules_path {
            if path.extension().map_or(true, |ext| ext != "toml") {
                return Err(format!("rules_path {:?} is not a .toml file", path));
            }
        }

        Ok(())
    }
}
