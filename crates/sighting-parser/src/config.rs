use std::path::Path;

use chrono::TimeDelta;
use serde::Deserialize;

use crate::errors::ConfigError;

pub const DEFAULT_MAX_EXPIRATION_MINUTES: i64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Upper bound on how far in the future a parsed expiration may lie.
    pub max_expiration_minutes: i64,
    /// Extra names recognized by the built-in subject extractor.
    pub subjects: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_expiration_minutes: DEFAULT_MAX_EXPIRATION_MINUTES,
            subjects: Vec::new(),
        }
    }
}

impl ParserConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ParserConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.max_horizon().map(|_| ())?;
        if let Some(blank) = self.subjects.iter().position(|name| name.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "subjects[{blank}] must not be blank"
            )));
        }
        Ok(())
    }

    pub fn max_horizon(&self) -> Result<TimeDelta, ConfigError> {
        if self.max_expiration_minutes <= 0 {
            return Err(ConfigError::Validation(format!(
                "max_expiration_minutes must be positive, got {}",
                self.max_expiration_minutes
            )));
        }
        TimeDelta::try_minutes(self.max_expiration_minutes).ok_or_else(|| {
            ConfigError::Validation(format!(
                "max_expiration_minutes {} is out of range",
                self.max_expiration_minutes
            ))
        })
    }
}
