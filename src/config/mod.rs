//! Executor configuration loading and management

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::ConfigError;
use crate::core::node::DEFAULT_TYPENAME_KEY;

/// Configuration of an [`Executor`](crate::execution::Executor)
///
/// Every field has a default, so an empty document is a valid
/// configuration.
///
/// # Example
/// ```yaml
/// max_depth: 32
/// typename_key: kind
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Maximum nesting of the response, counting both keys and list levels
    pub max_depth: usize,

    /// Key holding the type tag of JSON objects, used to match fragments
    pub typename_key: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            typename_key: DEFAULT_TYPENAME_KEY.to_string(),
        }
    }
}

fn default_max_depth() -> usize {
    64
}

impl ExecutorConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_typename_key(mut self, typename_key: impl Into<String>) -> Self {
        self.typename_key = typename_key.into();
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_depth".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.typename_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "typename_key".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
