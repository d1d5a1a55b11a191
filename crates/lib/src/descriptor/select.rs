//! Host-version selection.
//!
//! Selecting a host version picks the active branch of every conditional region
//! and merges it into the base declaration:
//!
//! - include roots and dependency sets are unioned (base first, then regions in
//!   declaration order)
//! - singleton fields are last-writer-wins in region declaration order; a body
//!   that leaves a singleton unset does not override it

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, trace};

use super::types::{DescriptorBody, ModuleDescriptor, PchMode};
use crate::version::HostVersion;

/// A descriptor with every conditional region resolved for one host version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveDescriptor {
  pub name: String,
  pub root: PathBuf,
  pub pch: PchMode,
  pub include_hygiene: bool,
  pub legacy_include_paths: bool,
  pub public_include_roots: Vec<PathBuf>,
  pub private_include_roots: Vec<PathBuf>,
  pub public_dependencies: BTreeSet<String>,
  pub private_dependencies: BTreeSet<String>,
  pub runtime_dependencies: BTreeSet<String>,
  pub private_include_path_modules: BTreeSet<String>,
}

impl EffectiveDescriptor {
  /// Names this module links against directly (public and private).
  pub fn compile_dependencies(&self) -> impl Iterator<Item = &String> {
    self.public_dependencies.iter().chain(self.private_dependencies.iter())
  }

  fn merge(&mut self, body: &DescriptorBody) {
    if let Some(pch) = body.pch {
      self.pch = pch;
    }
    if let Some(enabled) = body.include_hygiene {
      self.include_hygiene = enabled;
    }
    if let Some(enabled) = body.legacy_include_paths {
      self.legacy_include_paths = enabled;
    }

    append_unique(&mut self.public_include_roots, &body.public_include_roots);
    append_unique(&mut self.private_include_roots, &body.private_include_roots);
    self.public_dependencies.extend(body.public_dependencies.iter().cloned());
    self.private_dependencies.extend(body.private_dependencies.iter().cloned());
    self.runtime_dependencies.extend(body.runtime_dependencies.iter().cloned());
    self
      .private_include_path_modules
      .extend(body.private_include_path_modules.iter().cloned());
  }
}

fn append_unique(dst: &mut Vec<PathBuf>, src: &[PathBuf]) {
  for path in src {
    if !dst.iter().any(|p| p == path) {
      dst.push(path.clone());
    }
  }
}

impl ModuleDescriptor {
  /// Resolve every conditional region against `host` and merge the result.
  ///
  /// A region with no matching branch contributes nothing. A name that ends up
  /// in both the public and the private set is kept as public only.
  pub fn select(&self, host: &HostVersion) -> EffectiveDescriptor {
    let mut effective = EffectiveDescriptor {
      name: self.name.clone(),
      root: self.root.clone(),
      pch: self.pch,
      include_hygiene: self.include_hygiene,
      legacy_include_paths: self.legacy_include_paths,
      public_include_roots: Vec::new(),
      private_include_roots: Vec::new(),
      public_dependencies: BTreeSet::new(),
      private_dependencies: BTreeSet::new(),
      runtime_dependencies: BTreeSet::new(),
      private_include_path_modules: BTreeSet::new(),
    };
    effective.merge(&self.base);

    for (idx, region) in self.regions.iter().enumerate() {
      match region.active_branch(host) {
        Some(branch) => {
          trace!(module = %self.name, region = idx, when = %branch.when(), %host, "region branch active");
          effective.merge(branch.body());
        }
        None => trace!(module = %self.name, region = idx, %host, "no region branch active"),
      }
    }

    let both: Vec<String> = effective
      .private_dependencies
      .intersection(&effective.public_dependencies)
      .cloned()
      .collect();
    for name in both {
      debug!(module = %self.name, dependency = %name, "dependency declared public and private, keeping public");
      effective.private_dependencies.remove(&name);
    }

    effective
  }
}
