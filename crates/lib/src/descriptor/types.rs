//! Validated descriptor types.
//!
//! Everything here is produced by [`ModuleDescriptor::from_decl`] and is
//! read-only afterwards: fields are private and exposed through accessors.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::version::{HostVersion, VersionPredicate};

/// Precompiled-header strategy for a module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PchMode {
  /// No precompiled header.
  None,
  /// Use the shared precompiled header of the host.
  Shared,
  /// Use the module's own precompiled header if it declares one, else the shared one.
  #[default]
  ExplicitOrShared,
}

impl PchMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      PchMode::None => "none",
      PchMode::Shared => "shared",
      PchMode::ExplicitOrShared => "explicit-or-shared",
    }
  }
}

impl fmt::Display for PchMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The fields of a descriptor that regions can add to.
///
/// Used for both the unconditional part of a descriptor and the body of each
/// region branch. Singleton fields are `None` when the body leaves them unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorBody {
  pub(crate) pch: Option<PchMode>,
  pub(crate) include_hygiene: Option<bool>,
  pub(crate) legacy_include_paths: Option<bool>,
  pub(crate) public_include_roots: Vec<PathBuf>,
  pub(crate) private_include_roots: Vec<PathBuf>,
  pub(crate) public_dependencies: BTreeSet<String>,
  pub(crate) private_dependencies: BTreeSet<String>,
  pub(crate) runtime_dependencies: BTreeSet<String>,
  pub(crate) private_include_path_modules: BTreeSet<String>,
}

impl DescriptorBody {
  pub fn pch(&self) -> Option<PchMode> {
    self.pch
  }

  pub fn include_hygiene(&self) -> Option<bool> {
    self.include_hygiene
  }

  pub fn legacy_include_paths(&self) -> Option<bool> {
    self.legacy_include_paths
  }

  pub fn public_include_roots(&self) -> &[PathBuf] {
    &self.public_include_roots
  }

  pub fn private_include_roots(&self) -> &[PathBuf] {
    &self.private_include_roots
  }

  pub fn public_dependencies(&self) -> &BTreeSet<String> {
    &self.public_dependencies
  }

  pub fn private_dependencies(&self) -> &BTreeSet<String> {
    &self.private_dependencies
  }

  pub fn runtime_dependencies(&self) -> &BTreeSet<String> {
    &self.runtime_dependencies
  }

  pub fn private_include_path_modules(&self) -> &BTreeSet<String> {
    &self.private_include_path_modules
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

/// One guarded branch of a [`ConditionalRegion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionBranch {
  pub(crate) when: VersionPredicate,
  pub(crate) body: DescriptorBody,
}

impl RegionBranch {
  pub fn when(&self) -> &VersionPredicate {
    &self.when
  }

  pub fn body(&self) -> &DescriptorBody {
    &self.body
  }
}

/// A version-conditioned region.
///
/// Range branches never overlap and an `otherwise` branch can only come last,
/// so at most one branch is active for any host version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalRegion {
  pub(crate) branches: Vec<RegionBranch>,
}

impl ConditionalRegion {
  pub fn branches(&self) -> &[RegionBranch] {
    &self.branches
  }

  /// The branch active for `version`, if any.
  pub fn active_branch(&self, version: &HostVersion) -> Option<&RegionBranch> {
    self
      .branches
      .iter()
      .find(|branch| match &branch.when {
        VersionPredicate::Range(range) => range.contains(version),
        VersionPredicate::Otherwise => false,
      })
      .or_else(|| self.branches.iter().find(|branch| branch.when.is_otherwise()))
  }
}

/// An immutable, validated module declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
  pub(crate) name: String,
  pub(crate) root: PathBuf,
  pub(crate) pch: PchMode,
  pub(crate) include_hygiene: bool,
  pub(crate) legacy_include_paths: bool,
  pub(crate) base: DescriptorBody,
  pub(crate) regions: Vec<ConditionalRegion>,
}

impl ModuleDescriptor {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn pch(&self) -> PchMode {
    self.pch
  }

  pub fn include_hygiene(&self) -> bool {
    self.include_hygiene
  }

  pub fn legacy_include_paths(&self) -> bool {
    self.legacy_include_paths
  }

  /// The unconditional part of the declaration. Its singleton fields are
  /// always `None`; see [`Self::pch`] and friends for the authored values.
  pub fn base(&self) -> &DescriptorBody {
    &self.base
  }

  pub fn regions(&self) -> &[ConditionalRegion] {
    &self.regions
  }
}
