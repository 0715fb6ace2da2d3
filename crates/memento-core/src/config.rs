//! Factory configuration

use serde::{Deserialize, Serialize};

/// Memento factory configuration
///
/// # Example
/// ```rust
/// use memento_core::FactoryConfig;
///
/// let config = FactoryConfig::from_toml_str("cache_plans = false").unwrap();
/// assert!(!config.cache_plans);
/// assert!(config.check_value_kinds);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Reuse compiled creation plans across factory calls
    pub cache_plans: bool,
    /// Reject intercepted writes whose value kind does not match the field
    pub check_value_kinds: bool,
}

impl FactoryConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With plan caching on or off
    #[inline]
    #[must_use]
    pub fn with_plan_cache(mut self, enabled: bool) -> Self {
        self.cache_plans = enabled;
        self
    }

    /// With value kind checks on or off
    #[inline]
    #[must_use]
    pub fn with_value_kind_checks(mut self, enabled: bool) -> Self {
        self.check_value_kinds = enabled;
        self
    }

    /// Parse from a flat TOML table; missing keys keep their defaults
    ///
    /// # Errors
    /// Returns error if the document is not valid TOML or has wrong types
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            cache_plans: true,
            check_value_kinds: true,
        }
    }
}

/// Errors loading factory configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid factory config: {0}")]
    Parse(#[from] toml::de::Error),
}
