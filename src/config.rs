//! Configuration Module
//!
//! Handles loading and managing memoizer configuration from environment
//! variables or a JSON document.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MemoizerError, Result};

/// Default maximum number of memoized results
pub const DEFAULT_MAX_ELEMENTS: usize = 1024;

/// Default freshness window in milliseconds
pub const DEFAULT_TTL_MS: u64 = 1000;

/// Memoizer configuration parameters.
///
/// Missing fields in a JSON document take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoizerConfig {
    /// Maximum number of results kept; 0 disables storage
    pub max_elements: usize,
    /// Time in milliseconds a stored result stays fresh; 0 disables reuse
    pub ttl_ms: u64,
}

impl MemoizerConfig {
    /// Creates a configuration from a capacity and a TTL.
    ///
    /// TTLs are kept at millisecond precision; anything beyond `u64::MAX`
    /// milliseconds saturates.
    pub fn new(max_elements: usize, ttl: Duration) -> Self {
        Self {
            max_elements,
            ttl_ms: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Creates a new config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMOIZER_MAX_ELEMENTS` - Maximum stored results (default: 1024)
    /// - `MEMOIZER_TTL_MS` - Freshness window in milliseconds (default: 1000)
    ///
    /// Unset variables fall back to defaults; set but unparsable ones are an
    /// error.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            max_elements: env_or("MEMOIZER_MAX_ELEMENTS", DEFAULT_MAX_ELEMENTS)?,
            ttl_ms: env_or("MEMOIZER_TTL_MS", DEFAULT_TTL_MS)?,
        })
    }

    /// Parses a configuration from JSON.
    pub fn from_json(document: &str) -> Result<Self> {
        Ok(serde_json::from_str(document)?)
    }

    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = max_elements;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_ms = Self::new(self.max_elements, ttl).ttl_ms;
        self
    }

    /// Returns the freshness window.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for MemoizerConfig {
    fn default() -> Self {
        Self {
            max_elements: DEFAULT_MAX_ELEMENTS,
            ttl_ms: DEFAULT_TTL_MS,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            MemoizerError::InvalidConfig(format!(
                "{} must be a non-negative integer, got {:?}",
                name, raw
            ))
        }),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(env::VarError::NotUnicode(raw)) => Err(MemoizerError::InvalidConfig(format!(
            "{} is not valid unicode: {:?}",
            name, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = MemoizerConfig::default();
        assert_eq!(config.max_elements, 1024);
        assert_eq!(config.ttl_ms, 1000);
        assert_eq!(config.ttl(), Duration::from_secs(1));
    }

    #[test]
    fn test_config_builders() {
        let config = MemoizerConfig::default()
            .with_max_elements(2)
            .with_ttl(Duration::from_millis(250));

        assert_eq!(config, MemoizerConfig::new(2, Duration::from_millis(250)));
        assert_eq!(config.ttl_ms, 250);
    }

    #[test]
    fn test_config_saturates_huge_ttl() {
        let config = MemoizerConfig::new(1, Duration::MAX);
        assert_eq!(config.ttl_ms, u64::MAX);
    }

    #[test]
    fn test_config_from_json() {
        let config = MemoizerConfig::from_json(r#"{"max_elements": 8}"#).unwrap();
        assert_eq!(config.max_elements, 8);
        assert_eq!(config.ttl_ms, DEFAULT_TTL_MS);

        let config = MemoizerConfig::from_json(r#"{"max_elements": 0, "ttl_ms": 0}"#).unwrap();
        assert_eq!(config, MemoizerConfig::new(0, Duration::ZERO));
    }

    #[test]
    fn test_config_from_json_rejects_negative_ttl() {
        let result = MemoizerConfig::from_json(r#"{"ttl_ms": -5}"#);
        assert!(matches!(result, Err(MemoizerError::Malformed(_))));
    }

    // Environment variables are process-wide, so every env case lives in
    // this single test.
    #[test]
    fn test_config_from_env() {
        env::remove_var("MEMOIZER_MAX_ELEMENTS");
        env::remove_var("MEMOIZER_TTL_MS");
        assert_eq!(MemoizerConfig::from_env().unwrap(), MemoizerConfig::default());

        env::set_var("MEMOIZER_MAX_ELEMENTS", "16");
        env::set_var("MEMOIZER_TTL_MS", " 50 ");
        let config = MemoizerConfig::from_env().unwrap();
        assert_eq!(config.max_elements, 16);
        assert_eq!(config.ttl_ms, 50);

        env::set_var("MEMOIZER_TTL_MS", "-1");
        let result = MemoizerConfig::from_env();
        assert!(matches!(result, Err(MemoizerError::InvalidConfig(_))));

        env::remove_var("MEMOIZER_MAX_ELEMENTS");
        env::remove_var("MEMOIZER_TTL_MS");
    }
}
