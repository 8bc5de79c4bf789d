//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$REPOLENS_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/repolens/config.toml`
//! 3. `~/.repolens/config.toml`
//!
//! # Repo Config
//!
//! Located at `<git-dir>/repolens.toml`.
//!
//! # Validation
//!
//! Values are validated after parsing (e.g., `branch_scope` must be `local`
//! or `all`, binaries must not be empty).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::BranchScope;

/// Global configuration (host scope).
///
/// # Example
///
/// ```toml
/// git_binary = "/usr/bin/git"
/// du_binary = "du"
/// branch_scope = "all"
///
/// [log]
/// default_limit = 20
/// skip_merges = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Program used for history traversal
    pub git_binary: Option<String>,

    /// Program used for disk usage
    pub du_binary: Option<String>,

    /// Which branches count as branches (`local` or `all`)
    pub branch_scope: Option<String>,

    /// History defaults
    pub log: Option<LogDefaults>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [("git_binary", &self.git_binary), ("du_binary", &self.du_binary)] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(format!("{} cannot be empty", key)));
            }
        }

        validate_scope(self.branch_scope.as_deref())?;

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
/// branch_scope = "local"
///
/// [log]
/// default_limit = 50
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Overrides the global branch scope
    pub branch_scope: Option<String>,

    /// Overrides the global history defaults
    pub log: Option<LogDefaults>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_scope(self.branch_scope.as_deref())?;

        if let Some(log) = &self.log {
            log.validate()?;
        }

        Ok(())
    }
}

/// History paging defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogDefaults {
    /// Page size when the caller gives none
    pub default_limit: Option<usize>,

    /// Whether merges are excluded unless the caller says otherwise
    pub skip_merges: Option<bool>,
}

impl LogDefaults {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_limit == Some(0) {
            return Err(ConfigError::InvalidValue(
                "log.default_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn validate_scope(scope: Option<&str>) -> Result<(), ConfigError> {
    if let Some(scope) = scope {
        scope
            .parse::<BranchScope>()
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_parses_full_example() {
        let config: GlobalConfig = toml::from_str(
            r#"
            git_binary = "/usr/bin/git"
            du_binary = "du"
            branch_scope = "local"

            [log]
            default_limit = 50
            skip_merges = true
            "#,
        )
        .unwrap();

        assert_eq!(config.git_binary.as_deref(), Some("/usr/bin/git"));
        assert_eq!(config.branch_scope.as_deref(), Some("local"));
        let log = config.log.as_ref().unwrap();
        assert_eq!(log.default_limit, Some(50));
        assert_eq!(log.skip_merges, Some(true));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_binary_rejected() {
        let config = GlobalConfig {
            git_binary: Some("  ".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_scope_rejected() {
        let config = RepoConfig {
            branch_scope: Some("remote".into()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("remote"));
    }

    #[test]
    fn zero_limit_rejected() {
        let config = RepoConfig {
            log: Some(LogDefaults {
                default_limit: Some(0),
                skip_merges: None,
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<RepoConfig, _> = toml::from_str("trunk = \"main\"");
        assert!(result.is_err());
    }
}
