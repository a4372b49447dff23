//! Runtime configuration
//!
//! Read once at startup from `NUTRILOG_*` environment variables.

use std::path::PathBuf;

use thiserror::Error;

use crate::feed::DEFAULT_CAPACITY;
use crate::nutrition::RecipeScaling;

pub const DATABASE_PATH_VAR: &str = "NUTRILOG_DATABASE_PATH";
pub const LOG_VAR: &str = "NUTRILOG_LOG";
pub const RECIPE_SCALING_VAR: &str = "NUTRILOG_RECIPE_SCALING";
pub const FEED_CAPACITY_VAR: &str = "NUTRILOG_FEED_CAPACITY";

/// Filter used when neither `NUTRILOG_LOG` nor `RUST_LOG` is set
pub const DEFAULT_LOG_DIRECTIVE: &str = "nutrilog=info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': expected {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub log_directive: Option<String>,
    pub recipe_scaling: RecipeScaling,
    pub feed_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset and empty values use defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let recipe_scaling = match get(RECIPE_SCALING_VAR) {
            Some(value) => RecipeScaling::parse(&value).ok_or(ConfigError::Invalid {
                var: RECIPE_SCALING_VAR,
                value,
                expected: "'uniform' or 'unit_aware'",
            })?,
            None => RecipeScaling::default(),
        };

        let feed_capacity = match get(FEED_CAPACITY_VAR) {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: FEED_CAPACITY_VAR,
                        value,
                        expected: "a positive integer",
                    })
                }
            },
            None => DEFAULT_CAPACITY,
        };

        Ok(Self {
            database_path: get(DATABASE_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(default_database_path),
            log_directive: get(LOG_VAR),
            recipe_scaling,
            feed_capacity,
        })
    }
}

/// `<project>/data/nutrilog.db`, located from the running executable
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutrilog.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert!(config.database_path.ends_with("data/nutrilog.db"));
        assert_eq!(config.recipe_scaling, RecipeScaling::Uniform100);
        assert_eq!(config.feed_capacity, DEFAULT_CAPACITY);
        assert!(config.log_directive.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (DATABASE_PATH_VAR, "/tmp/diary.db"),
            (RECIPE_SCALING_VAR, "unit_aware"),
            (FEED_CAPACITY_VAR, "8"),
            (LOG_VAR, "nutrilog=debug"),
        ])
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/diary.db"));
        assert_eq!(config.recipe_scaling, RecipeScaling::ByUnitKind);
        assert_eq!(config.feed_capacity, 8);
        assert_eq!(config.log_directive.as_deref(), Some("nutrilog=debug"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[(RECIPE_SCALING_VAR, "sideways")]).is_err());
        assert!(config_from(&[(FEED_CAPACITY_VAR, "0")]).is_err());
        assert!(config_from(&[(FEED_CAPACITY_VAR, "many")]).is_err());
    }
}
