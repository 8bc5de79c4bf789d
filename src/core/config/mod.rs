//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Two configuration scopes:
//! - **Global**: host-level settings (binaries, defaults)
//! - **Repo**: per-repository overrides stored in the git directory
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$REPOLENS_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/repolens/config.toml`
//! 3. `~/.repolens/config.toml`
//!
//! # Repo Config Location
//!
//! `<git-dir>/repolens.toml`. For a bare repository the git directory is the
//! repository root.
//!
//! # Example
//!
//! ```no_run
//! use repolens::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/srv/git/project.git"))).unwrap();
//! println!("git: {}", config.git_binary());
//! println!("scope: {}", config.branch_scope());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, LogDefaults, RepoConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::types::BranchScope;
use crate::history::DEFAULT_LIMIT;

/// File name of the per-repository config inside the git directory.
pub const REPO_CONFIG_FILE: &str = "repolens.toml";

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
/// Accessors apply precedence rules: repo config overrides global config,
/// which overrides built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if one was found)
    pub repo: Option<RepoConfig>,
    global_path: Option<PathBuf>,
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// If `git_dir` is provided, also loads `<git_dir>/repolens.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated. Missing files are not an error.
    pub fn load(git_dir: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(Self::find_global().as_deref(), git_dir)
    }

    /// Load configuration from an explicit global file.
    ///
    /// `global` may be `None` (or a path that does not exist) to use defaults.
    pub fn load_from(global: Option<&Path>, git_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let (global, global_path) = match global.filter(|p| p.exists()) {
            Some(path) => (read_toml::<GlobalConfig>(path)?, Some(path.to_path_buf())),
            None => (GlobalConfig::default(), None),
        };

        let repo_file = git_dir
            .map(|dir| dir.join(REPO_CONFIG_FILE))
            .filter(|p| p.exists());
        let (repo, repo_path) = match repo_file {
            Some(path) => (Some(read_toml::<RepoConfig>(&path)?), Some(path)),
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        tracing::debug!(
            global = ?global_path,
            repo = ?repo_path,
            "loaded configuration"
        );

        Ok(Config {
            global,
            repo,
            global_path,
            repo_path,
        })
    }

    /// Locate the global config file, if any.
    fn find_global() -> Option<PathBuf> {
        // 1. $REPOLENS_CONFIG
        if let Ok(path) = std::env::var("REPOLENS_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. $XDG_CONFIG_HOME/repolens/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("repolens/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. ~/.repolens/config.toml
        dirs::home_dir()
            .map(|home| home.join(".repolens/config.toml"))
            .filter(|p| p.exists())
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Program used for history traversal. Defaults to `git`.
    pub fn git_binary(&self) -> &str {
        self.global.git_binary.as_deref().unwrap_or("git")
    }

    /// Program used for disk usage. Defaults to `du`.
    pub fn du_binary(&self) -> &str {
        self.global.du_binary.as_deref().unwrap_or("du")
    }

    /// Branch scope. Defaults to [`BranchScope::All`].
    pub fn branch_scope(&self) -> BranchScope {
        self.repo
            .as_ref()
            .and_then(|r| r.branch_scope.as_deref())
            .or(self.global.branch_scope.as_deref())
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// History page size. Defaults to [`DEFAULT_LIMIT`].
    pub fn log_limit(&self) -> usize {
        self.log_setting(|l| l.default_limit)
            .unwrap_or(DEFAULT_LIMIT)
    }

    /// Whether merges are skipped by default. Defaults to `false`.
    pub fn skip_merges(&self) -> bool {
        self.log_setting(|l| l.skip_merges).unwrap_or(false)
    }

    fn log_setting<T>(&self, get: impl Fn(&LogDefaults) -> Option<T>) -> Option<T> {
        self.repo
            .as_ref()
            .and_then(|r| r.log.as_ref())
            .and_then(&get)
            .or_else(|| self.global.log.as_ref().and_then(&get))
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

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_files() {
        let config = Config::load_from(None, None).unwrap();

        assert_eq!(config.git_binary(), "git");
        assert_eq!(config.du_binary(), "du");
        assert_eq!(config.branch_scope(), BranchScope::All);
        assert_eq!(config.log_limit(), DEFAULT_LIMIT);
        assert!(!config.skip_merges());
        assert!(config.global_config_loaded_from().is_none());
        assert!(config.repo_config_loaded_from().is_none());
    }

    #[test]
    fn missing_global_path_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(Some(temp.path().join("nope.toml").as_path()), None).unwrap();
        assert_eq!(config.git_binary(), "git");
    }

    #[test]
    fn load_global_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            git_binary = "/opt/git/bin/git"
            branch_scope = "local"
            "#,
        )
        .unwrap();

        let config = Config::load_from(Some(path.as_path()), None).unwrap();
        assert_eq!(config.git_binary(), "/opt/git/bin/git");
        assert_eq!(config.branch_scope(), BranchScope::Local);
        assert_eq!(config.global_config_loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn repo_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
            branch_scope = "local"
            [log]
            default_limit = 30
            skip_merges = true
            "#,
        )
        .unwrap();

        let git_dir = temp.path().join("project.git");
        fs::create_dir_all(&git_dir).unwrap();
        fs::write(
            git_dir.join(REPO_CONFIG_FILE),
            r#"
            branch_scope = "all"
            [log]
            default_limit = 5
            "#,
        )
        .unwrap();

        let config = Config::load_from(Some(global.as_path()), Some(git_dir.as_path())).unwrap();
        assert_eq!(config.branch_scope(), BranchScope::All);
        assert_eq!(config.log_limit(), 5);
        // Not set at repo scope, so the global value applies
        assert!(config.skip_merges());
    }

    #[test]
    fn invalid_repo_value_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(REPO_CONFIG_FILE), "branch_scope = \"everything\"").unwrap();

        let result = Config::load_from(None, Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "git_binary = ").unwrap();

        let result = Config::load_from(Some(path.as_path()), None);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
