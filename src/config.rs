use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::diagnostics::ConfigError;

/// Configuration for test execution and reporting.
///
/// Every field is optional in YAML; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Regex matched against case names; cases that don't match are skipped.
    pub filter: Option<String>,
    /// Stop after the first failed group.
    pub fail_fast: bool,
    /// Treat configuration errors as fatal to the whole run.
    pub abort_on_config_error: bool,
    pub use_colors: bool,
    /// Warn about invocations whose arguments repeat an earlier one.
    pub report_redundant: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            filter: None,
            fail_fast: false,
            abort_on_config_error: true,
            use_colors: atty::is(atty::Stream::Stderr),
            report_redundant: true,
        }
    }
}

impl RunConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source).map_err(|e| ConfigError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.compiled_filter()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn compiled_filter(&self) -> Result<Option<Regex>, ConfigError> {
        self.filter
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidConfig {
                    message: format!("invalid filter `{pattern}`: {e}"),
                })
            })
            .transpose()
    }
}
