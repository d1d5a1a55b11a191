//! Host version values and the range predicates that gate conditional regions.
//!
//! A [`HostVersion`] is the single value a build is resolved against. Conditional
//! regions in a descriptor are keyed by [`VersionPredicate`]s, which are parsed
//! once at construction time and evaluated during resolution.

mod predicate;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use predicate::{PredicateError, VersionPredicate, VersionRange};

/// The version of the host application a build targets.
///
/// Written as `major[.minor[.patch]]`; omitted components are zero, so `4.24`
/// and `4.24.0` are the same version. Pre-release and build metadata are not
/// accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostVersion {
  pub major: u64,
  pub minor: u64,
  pub patch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version '{input}': {reason}")]
pub struct VersionParseError {
  pub input: String,
  pub reason: String,
}

impl HostVersion {
  pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
    Self { major, minor, patch }
  }
}

impl From<&semver::Version> for HostVersion {
  fn from(version: &semver::Version) -> Self {
    Self::new(version.major, version.minor, version.patch)
  }
}

impl FromStr for HostVersion {
  type Err = VersionParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let err = |reason: String| VersionParseError {
      input: s.to_string(),
      reason,
    };

    let trimmed = s.trim();
    if trimmed.is_empty() {
      return Err(err("version cannot be empty".to_string()));
    }

    // semver wants all three components
    let padded = match trimmed.split('.').count() {
      1 => format!("{trimmed}.0.0"),
      2 => format!("{trimmed}.0"),
      _ => trimmed.to_string(),
    };
    let version = semver::Version::parse(&padded).map_err(|e| err(e.to_string()))?;
    if !version.pre.is_empty() || !version.build.is_empty() {
      return Err(err("pre-release and build metadata are not supported".to_string()));
    }

    Ok(Self::from(&version))
  }
}

impl TryFrom<String> for HostVersion {
  type Error = VersionParseError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<HostVersion> for String {
  fn from(value: HostVersion) -> Self {
    value.to_string()
  }
}

impl fmt::Display for HostVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_partial_versions() {
    assert_eq!("4".parse::<HostVersion>().unwrap(), HostVersion::new(4, 0, 0));
    assert_eq!("4.24".parse::<HostVersion>().unwrap(), HostVersion::new(4, 24, 0));
    assert_eq!(" 5.1.3 ".parse::<HostVersion>().unwrap(), HostVersion::new(5, 1, 3));
  }

  #[test]
  fn rejects_malformed_versions() {
    for input in ["", "4.", ".4", "4.x", "4.24.1.2", "-1", "4 .2", "4.24.0-beta", "4.24.0+build5"] {
      assert!(input.parse::<HostVersion>().is_err(), "expected '{}' to be rejected", input);
    }
  }

  #[test]
  fn orders_by_component() {
    let v424: HostVersion = "4.24".parse().unwrap();
    let v4241: HostVersion = "4.24.1".parse().unwrap();
    let v426: HostVersion = "4.26".parse().unwrap();
    let v5: HostVersion = "5".parse().unwrap();

    assert!(v424 < v4241);
    assert!(v4241 < v426);
    assert!(v426 < v5);
  }

  #[test]
  fn serializes_as_string() {
    let v = HostVersion::new(4, 26, 2);
    let json = serde_json::to_string(&v).unwrap();
    assert_eq!(json, "\"4.26.2\"");

    let back: HostVersion = serde_json::from_str("\"4.26\"").unwrap();
    assert_eq!(back, HostVersion::new(4, 26, 0));
  }
}
