//! Resolution configuration.
//!
//! Values come from the environment first; callers such as the CLI overwrite
//! individual fields afterwards.

use thiserror::Error;

use crate::consts::{HOST_VERSION_ENV, SKIP_PATH_CHECKS_ENV};
use crate::descriptor::ValidateOptions;
use crate::version::{HostVersion, VersionParseError};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("no host version given (pass --host-version or set MODGRAPH_HOST_VERSION)")]
  MissingHostVersion,

  #[error("invalid host version in {var}: {source}")]
  InvalidHostVersion {
    var: &'static str,
    #[source]
    source: VersionParseError,
  },
}

/// Configuration for one build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveConfig {
  /// Host version to select conditional regions against.
  pub host_version: Option<HostVersion>,

  /// Require declared include roots to exist on disk.
  pub check_include_paths: bool,

  /// Validate descriptors on the rayon pool.
  pub parallel_validation: bool,
}

impl Default for ResolveConfig {
  fn default() -> Self {
    Self {
      host_version: None,
      check_include_paths: true,
      parallel_validation: true,
    }
  }
}

impl ResolveConfig {
  /// Build a configuration from `MODGRAPH_HOST_VERSION` and
  /// `MODGRAPH_SKIP_PATH_CHECKS`, falling back to defaults.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut config = Self::default();

    if let Some(raw) = env_value(HOST_VERSION_ENV) {
      let version = raw.parse().map_err(|source| ConfigError::InvalidHostVersion {
        var: HOST_VERSION_ENV,
        source,
      })?;
      config.host_version = Some(version);
    }

    if env_value(SKIP_PATH_CHECKS_ENV).is_some_and(|v| is_truthy(&v)) {
      config.check_include_paths = false;
    }

    Ok(config)
  }

  /// The configured host version.
  pub fn host_version(&self) -> Result<HostVersion, ConfigError> {
    self.host_version.ok_or(ConfigError::MissingHostVersion)
  }

  pub fn validate_options(&self) -> ValidateOptions {
    ValidateOptions {
      check_include_paths: self.check_include_paths,
    }
  }
}

/// A set, non-blank environment variable.
fn env_value(var: &str) -> Option<String> {
  std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn is_truthy(value: &str) -> bool {
  matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
