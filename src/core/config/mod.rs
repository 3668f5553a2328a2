//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! gitmodel has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides, stored inside the git directory
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$GITMODEL_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitmodel/config.toml`
//! 3. `~/.gitmodel/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use gitmodel::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/repo/.git"))).unwrap();
//! println!("Max symbolic depth: {}", config.max_symbolic_depth());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, LogConfig, OpenConfig, RepoConfig, ResolveConfig};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::core::reference::{DEFAULT_MAX_SYMBOLIC_DEPTH, MAX_SYMBOLIC_DEPTH_LIMIT};

/// Environment variable naming an explicit global config file.
pub const CONFIG_ENV: &str = "GITMODEL_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessor methods apply precedence rules: repo config overrides global
/// config, which overrides built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if a repository was given)
    pub repo: Option<RepoConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `git_dir` is provided, also loads repo-specific config from it.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or
    /// contain invalid values. Missing files are not an error.
    pub fn load(git_dir: Option<&Path>) -> Result<Config, ConfigError> {
        let global_path = Self::find_global();
        Self::load_from(global_path.as_deref(), git_dir)
    }

    /// Load configuration from an explicit global file and git directory.
    ///
    /// Either may be absent; absent or missing files fall back to defaults.
    pub fn load_from(
        global_file: Option<&Path>,
        git_dir: Option<&Path>,
    ) -> Result<Config, ConfigError> {
        let (global, global_path) = match global_file.filter(|p| p.exists()) {
            Some(path) => (read_toml::<GlobalConfig>(path)?, Some(path.to_path_buf())),
            None => (GlobalConfig::default(), None),
        };

        let (repo, repo_path) = match git_dir.map(Self::repo_config_path) {
            Some(path) if path.exists() => (Some(read_toml::<RepoConfig>(&path)?), Some(path)),
            _ => (None, None),
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        Ok(Config {
            global,
            repo,
            global_path,
            repo_path,
        })
    }

    /// Locate the global config file, if any exists.
    fn find_global() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("gitmodel/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".gitmodel/config.toml"))
            .filter(|path| path.exists())
    }

    /// Get the canonical path for repo config inside a git directory.
    pub fn repo_config_path(git_dir: &Path) -> PathBuf {
        git_dir.join("gitmodel/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Maximum symbolic hops during reference resolution.
    ///
    /// Defaults to [`DEFAULT_MAX_SYMBOLIC_DEPTH`], capped at [`MAX_SYMBOLIC_DEPTH_LIMIT`].
    pub fn max_symbolic_depth(&self) -> usize {
        let repo = self
            .repo
            .as_ref()
            .and_then(|r| r.resolve.as_ref())
            .and_then(|r| r.max_symbolic_depth);
        let global = self
            .global
            .resolve
            .as_ref()
            .and_then(|r| r.max_symbolic_depth);
        repo.or(global)
            .unwrap_or(DEFAULT_MAX_SYMBOLIC_DEPTH)
            .min(MAX_SYMBOLIC_DEPTH_LIMIT)
    }

    /// Whether opening searches parent directories.
    ///
    /// Defaults to `true`.
    pub fn discover(&self) -> bool {
        self.global
            .open
            .as_ref()
            .and_then(|o| o.discover)
            .unwrap_or(true)
    }

    /// Whether bare repositories may be opened.
    ///
    /// Defaults to `true`.
    pub fn allow_bare(&self) -> bool {
        self.global
            .open
            .as_ref()
            .and_then(|o| o.allow_bare)
            .unwrap_or(true)
    }

    /// Default log level for the binary.
    ///
    /// Defaults to `"warn"`.
    pub fn log_level(&self) -> &str {
        self.global
            .log
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("warn")
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

/// Read and parse a TOML config file.
fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
