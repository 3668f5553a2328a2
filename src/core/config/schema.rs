//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$GITMODEL_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitmodel/config.toml`
//! 3. `~/.gitmodel/config.toml`
//!
//! # Repo Config
//!
//! Located at `<git_dir>/gitmodel/config.toml`.
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g., the symbolic depth must
//! be within the supported range).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::reference::MAX_SYMBOLIC_DEPTH_LIMIT;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// [resolve]
/// max_symbolic_depth = 5
///
/// [open]
/// discover = true
/// allow_bare = true
///
/// [log]
/// level = "warn"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Reference resolution settings
    pub resolve: Option<ResolveConfig>,

    /// Repository opening settings
    pub open: Option<OpenConfig>,

    /// Logging settings for the binary
    pub log: Option<LogConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(resolve) = &self.resolve {
            resolve.validate()?;
        }
        if let Some(log) = &self.log {
            log.validate()?;
        }
        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// [resolve]
/// max_symbolic_depth = 8
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Reference resolution settings
    pub resolve: Option<ResolveConfig>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(resolve) = &self.resolve {
            resolve.validate()?;
        }
        Ok(())
    }
}

/// Reference resolution settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveConfig {
    /// Maximum symbolic hops followed before giving up
    pub max_symbolic_depth: Option<usize>,
}

impl ResolveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(depth) = self.max_symbolic_depth {
            if depth == 0 || depth > MAX_SYMBOLIC_DEPTH_LIMIT {
                return Err(ConfigError::InvalidValue(format!(
                    "max_symbolic_depth must be between 1 and {}, got {}",
                    MAX_SYMBOLIC_DEPTH_LIMIT, depth
                )));
            }
        }
        Ok(())
    }
}

/// Repository opening settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OpenConfig {
    /// Search parent directories for a repository
    pub discover: Option<bool>,

    /// Accept repositories without a working directory
    pub allow_bare: Option<bool>,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Default level: "error", "warn", "info", "debug" or "trace"
    pub level: Option<String>,
}

impl LogConfig {
    /// Valid log levels.
    pub const VALID_LEVELS: &'static [&'static str] = &["error", "warn", "info", "debug", "trace"];

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = &self.level {
            if !Self::VALID_LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid log level '{}', must be one of: {}",
                    level,
                    Self::VALID_LEVELS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_global() {
        let config: GlobalConfig = toml::from_str(
            r#"
            [resolve]
            max_symbolic_depth = 8

            [open]
            discover = false
            allow_bare = false

            [log]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.resolve.as_ref().unwrap().max_symbolic_depth, Some(8));
        assert_eq!(config.open.as_ref().unwrap().discover, Some(false));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn depth_out_of_range_rejected() {
        for depth in [0, MAX_SYMBOLIC_DEPTH_LIMIT + 1] {
            let config = RepoConfig {
                resolve: Some(ResolveConfig {
                    max_symbolic_depth: Some(depth),
                }),
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn invalid_log_level_rejected() {
        let config = GlobalConfig {
            log: Some(LogConfig {
                level: Some("loud".into()),
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn repo_config_rejects_global_sections() {
        let result: Result<RepoConfig, _> = toml::from_str("[open]\ndiscover = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn serialize_roundtrip() {
        let config = RepoConfig {
            resolve: Some(ResolveConfig {
                max_symbolic_depth: Some(3),
            }),
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: RepoConfig = toml::from_str(&text).unwrap();
        assert_eq!(config, parsed);
    }
}
