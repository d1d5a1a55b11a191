//! Version-range predicates.
//!
//! A predicate is a comma-separated list of comparators that are intersected
//! into a single [`VersionRange`]:
//!
//! ```text
//! >=4.24            4.24.0 and later
//! >=4.24, <4.26     4.24.0 up to (not including) 4.26.0
//! =4.25             the whole 4.25.x family
//! <=4.25, >4.25     up to the end of / past the whole 4.25.x family
//! 4.25.1            exactly 4.25.1
//! *                 every version
//! otherwise         fallback branch of a region
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::Bound;

use thiserror::Error;

use semver::{Comparator, Op};

use super::HostVersion;

#[derive(Debug, Error)]
pub enum PredicateError {
  #[error("predicate cannot be empty")]
  Empty,

  #[error("invalid comparator '{0}'")]
  InvalidComparator(String),

  #[error("invalid comparator '{input}': {source}")]
  Malformed {
    input: String,
    #[source]
    source: semver::Error,
  },

  #[error("comparator '{0}' is not supported; use =, >, >=, <, <= or *")]
  UnsupportedOperator(String),

  /// The comparators exclude every version.
  #[error("'{0}' matches no version")]
  EmptyRange(String),
}

/// A contiguous range of host versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
  lower: Bound<HostVersion>,
  upper: Bound<HostVersion>,
}

impl VersionRange {
  /// The range containing every version.
  pub const fn any() -> Self {
    Self {
      lower: Bound::Unbounded,
      upper: Bound::Unbounded,
    }
  }

  pub fn new(lower: Bound<HostVersion>, upper: Bound<HostVersion>) -> Self {
    Self { lower, upper }
  }

  pub fn at_least(version: HostVersion) -> Self {
    Self::new(Bound::Included(version), Bound::Unbounded)
  }

  pub fn below(version: HostVersion) -> Self {
    Self::new(Bound::Unbounded, Bound::Excluded(version))
  }

  pub fn contains(&self, version: &HostVersion) -> bool {
    let above_lower = match &self.lower {
      Bound::Included(v) => version >= v,
      Bound::Excluded(v) => version > v,
      Bound::Unbounded => true,
    };
    let below_upper = match &self.upper {
      Bound::Included(v) => version <= v,
      Bound::Excluded(v) => version < v,
      Bound::Unbounded => true,
    };
    above_lower && below_upper
  }

  pub fn is_empty(&self) -> bool {
    match (&self.lower, &self.upper) {
      (Bound::Unbounded, _) | (_, Bound::Unbounded) => false,
      (Bound::Included(lo), Bound::Included(hi)) => lo > hi,
      (Bound::Included(lo), Bound::Excluded(hi))
      | (Bound::Excluded(lo), Bound::Included(hi))
      | (Bound::Excluded(lo), Bound::Excluded(hi)) => lo >= hi,
    }
  }

  pub fn intersect(&self, other: &Self) -> Self {
    Self {
      lower: tighter_lower(self.lower, other.lower),
      upper: tighter_upper(self.upper, other.upper),
    }
  }

  pub fn overlaps(&self, other: &Self) -> bool {
    !self.intersect(other).is_empty()
  }

  pub fn parse(input: &str) -> Result<Self, PredicateError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
      return Err(PredicateError::Empty);
    }

    let mut range = Self::any();
    for comparator in trimmed.split(',') {
      range = range.intersect(&parse_comparator(comparator.trim())?);
    }

    if range.is_empty() {
      return Err(PredicateError::EmptyRange(trimmed.to_string()));
    }

    Ok(range)
  }
}

fn parse_comparator(input: &str) -> Result<VersionRange, PredicateError> {
  if input.is_empty() {
    return Err(PredicateError::InvalidComparator(input.to_string()));
  }
  if input == "*" {
    return Ok(VersionRange::any());
  }

  // A bare version is exact here, where semver would read it as a caret requirement.
  let text = if input.starts_with(|c: char| c.is_ascii_digit()) {
    format!("={input}")
  } else {
    input.to_string()
  };
  let comparator: Comparator = text.parse().map_err(|source| PredicateError::Malformed {
    input: input.to_string(),
    source,
  })?;
  if !comparator.pre.is_empty() {
    return Err(PredicateError::UnsupportedOperator(input.to_string()));
  }

  let start = HostVersion::new(
    comparator.major,
    comparator.minor.unwrap_or(0),
    comparator.patch.unwrap_or(0),
  );
  let end = family_end(&comparator);
  let full = comparator.patch.is_some();

  let range = match comparator.op {
    Op::GreaterEq => VersionRange::at_least(start),
    Op::Less => VersionRange::below(start),
    Op::Greater if full => VersionRange::new(Bound::Excluded(start), Bound::Unbounded),
    Op::Greater => match end {
      Some(end) => VersionRange::at_least(end),
      None => return Err(PredicateError::EmptyRange(input.to_string())),
    },
    Op::LessEq if full => VersionRange::new(Bound::Unbounded, Bound::Included(start)),
    Op::LessEq => match end {
      Some(end) => VersionRange::below(end),
      None => VersionRange::any(),
    },
    Op::Exact | Op::Wildcard if full => VersionRange::new(Bound::Included(start), Bound::Included(start)),
    Op::Exact | Op::Wildcard => match end {
      Some(end) => VersionRange::new(Bound::Included(start), Bound::Excluded(end)),
      None => VersionRange::at_least(start),
    },
    _ => return Err(PredicateError::UnsupportedOperator(input.to_string())),
  };

  Ok(range)
}

/// The first version past the family a partial comparator names.
///
/// `None` for a full `major.minor.patch` comparator, whose family is a single
/// version, or when the bumped component overflows.
fn family_end(comparator: &Comparator) -> Option<HostVersion> {
  match (comparator.minor, comparator.patch) {
    (_, Some(_)) => None,
    (Some(minor), None) => minor
      .checked_add(1)
      .map(|minor| HostVersion::new(comparator.major, minor, 0)),
    (None, _) => comparator.major.checked_add(1).map(|major| HostVersion::new(major, 0, 0)),
  }
}

fn tighter_lower(a: Bound<HostVersion>, b: Bound<HostVersion>) -> Bound<HostVersion> {
  match (a, b) {
    (Bound::Unbounded, other) | (other, Bound::Unbounded) => other,
    (Bound::Included(x), Bound::Included(y)) => Bound::Included(x.max(y)),
    (Bound::Excluded(x), Bound::Excluded(y)) => Bound::Excluded(x.max(y)),
    (Bound::Included(inc), Bound::Excluded(exc)) | (Bound::Excluded(exc), Bound::Included(inc)) => {
      match inc.cmp(&exc) {
        Ordering::Greater => Bound::Included(inc),
        Ordering::Less | Ordering::Equal => Bound::Excluded(exc),
      }
    }
  }
}

fn tighter_upper(a: Bound<HostVersion>, b: Bound<HostVersion>) -> Bound<HostVersion> {
  match (a, b) {
    (Bound::Unbounded, other) | (other, Bound::Unbounded) => other,
    (Bound::Included(x), Bound::Included(y)) => Bound::Included(x.min(y)),
    (Bound::Excluded(x), Bound::Excluded(y)) => Bound::Excluded(x.min(y)),
    (Bound::Included(inc), Bound::Excluded(exc)) | (Bound::Excluded(exc), Bound::Included(inc)) => {
      match inc.cmp(&exc) {
        Ordering::Less => Bound::Included(inc),
        Ordering::Greater | Ordering::Equal => Bound::Excluded(exc),
      }
    }
  }
}

impl fmt::Display for VersionRange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match (&self.lower, &self.upper) {
      (Bound::Unbounded, Bound::Unbounded) => write!(f, "*"),
      (Bound::Included(lo), Bound::Included(hi)) if lo == hi => write!(f, "={}", lo),
      (lower, upper) => {
        let lower = match lower {
          Bound::Included(v) => Some(format!(">={}", v)),
          Bound::Excluded(v) => Some(format!(">{}", v)),
          Bound::Unbounded => None,
        };
        let upper = match upper {
          Bound::Included(v) => Some(format!("<={}", v)),
          Bound::Excluded(v) => Some(format!("<{}", v)),
          Bound::Unbounded => None,
        };
        let parts: Vec<String> = lower.into_iter().chain(upper).collect();
        write!(f, "{}", parts.join(", "))
      }
    }
  }
}

/// The guard on one branch of a conditional region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionPredicate {
  /// Active when the host version falls in the range.
  Range(VersionRange),
  /// Active when no other branch of the same region is.
  Otherwise,
}

impl VersionPredicate {
  pub fn parse(input: &str) -> Result<Self, PredicateError> {
    match input.trim() {
      "otherwise" | "else" => Ok(Self::Otherwise),
      other => VersionRange::parse(other).map(Self::Range),
    }
  }

  pub fn is_otherwise(&self) -> bool {
    matches!(self, Self::Otherwise)
  }
}

impl fmt::Display for VersionPredicate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Range(range) => write!(f, "{}", range),
      Self::Otherwise => write!(f, "otherwise"),
    }
  }
}
