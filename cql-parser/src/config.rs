//! Parser configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nesting depth allowed when no configuration says otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Deepest nesting any configuration may ask for. Each level costs several
/// stack frames, so larger limits risk overflowing a default thread stack.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Errors raised while loading a [`ParserConfig`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid parser config: {0}")]
    Toml(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Knobs for a parse call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Maximum nesting of data types, collection literals and function calls.
    pub max_depth: usize,
    /// Resynchronize at the next `;` after a failed statement in script mode.
    pub recover: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            recover: true,
        }
    }
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_recovery(mut self, recover: bool) -> Self {
        self.recover = recover;
        self
    }

    /// Load a configuration from a TOML document. Missing keys keep defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ParserConfig =
            toml::from_str(source).map_err(|e| ConfigError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_depth".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "max_depth".to_string(),
                reason: format!("must be at most {}", MAX_DEPTH_LIMIT),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.max_depth, 128);
        assert!(config.recover);
    }

    #[test]
    fn test_from_toml_partial() -> Result<(), ConfigError> {
        let config = ParserConfig::from_toml_str("max_depth = 16")?;
        assert_eq!(config.max_depth, 16);
        assert!(config.recover);
        Ok(())
    }

    #[test]
    fn test_from_toml_rejects_zero_depth() {
        let err = ParserConfig::from_toml_str("max_depth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "max_depth"));
    }

    #[test]
    fn test_from_toml_rejects_excessive_depth() {
        let err = ParserConfig::from_toml_str("max_depth = 1_000_000").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                field: "max_depth".to_string(),
                reason: "must be at most 256".to_string(),
            }
        );
        assert!(ParserConfig::from_toml_str("max_depth = 256").is_ok());
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        let err = ParserConfig::from_toml_str("depth = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
