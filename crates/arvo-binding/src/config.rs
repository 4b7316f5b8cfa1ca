use serde::{Deserialize, Serialize};

use crate::error::{BindingError, Result};

/// Behavior switches for attribute bindings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Convert raw keys to snake_case before construction.
    pub normalize_keys: bool,
    /// Cache typed values per raw generation. When off, every read
    /// reconstructs.
    pub memoize: bool,
    /// Separator used when addressing nested validation errors.
    pub path_separator: String,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            normalize_keys: true,
            memoize: true,
            path_separator: "/".to_string(),
        }
    }
}

impl BindingConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| BindingError::Config(e.to_string()))?;
        if config.path_separator.is_empty() {
            return Err(BindingError::Config("path_separator must not be empty".into()));
        }
        Ok(config)
    }
}
