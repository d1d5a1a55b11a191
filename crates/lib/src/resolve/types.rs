use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::Serialize;

use crate::descriptor::PchMode;
use crate::runtime::RuntimeModuleTable;
use crate::util::hash::Hashable;
use crate::version::HostVersion;

/// One module after version selection and dependency propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedModule {
  pub name: String,
  pub root: PathBuf,
  pub pch: PchMode,
  pub include_hygiene: bool,
  pub legacy_include_paths: bool,

  /// Include roots this module declares as visible to dependents.
  pub public_include_roots: Vec<PathBuf>,

  /// Include roots this module declares for itself only.
  pub private_include_roots: Vec<PathBuf>,

  /// Every include root visible while compiling this module: its own roots
  /// first, then the public roots of each visible module in build order.
  pub include_roots: Vec<PathBuf>,

  /// Modules re-exported to dependents: the declared public dependencies
  /// plus everything they re-export in turn.
  pub public_dependencies: BTreeSet<String>,

  /// Declared private dependencies.
  pub private_dependencies: BTreeSet<String>,

  /// Every module linked into this one, in build order.
  pub link_dependencies: Vec<String>,

  pub runtime_dependencies: BTreeSet<String>,
  pub private_include_path_modules: BTreeSet<String>,
}

/// The outcome of resolving every registered module for one host version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
  pub(crate) host_version: HostVersion,
  pub(crate) build_order: Vec<String>,
  pub(crate) modules: BTreeMap<String, ResolvedModule>,
  pub(crate) runtime: RuntimeModuleTable,
}

impl Hashable for Resolution {}

impl Resolution {
  pub fn host_version(&self) -> HostVersion {
    self.host_version
  }

  /// Module names, each after all of its compile-time dependencies.
  pub fn build_order(&self) -> &[String] {
    &self.build_order
  }

  pub fn module(&self, name: &str) -> Option<&ResolvedModule> {
    self.modules.get(name)
  }

  /// Resolved modules in build order.
  pub fn modules(&self) -> impl Iterator<Item = &ResolvedModule> {
    self.build_order.iter().filter_map(|name| self.modules.get(name))
  }

  pub fn runtime(&self) -> &RuntimeModuleTable {
    &self.runtime
  }

  pub fn len(&self) -> usize {
    self.build_order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.build_order.is_empty()
  }
}
