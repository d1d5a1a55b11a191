//! Dependency resolution.
//!
//! Resolution runs in four steps over an already validated set of modules:
//!
//! 1. Select every descriptor for the host version
//! 2. Check that every compile-time and include-path name is registered
//! 3. Order the compile-time graph, failing on cycles
//! 4. Propagate public dependencies and compute include and link sets
//!
//! Runtime-only names are collected into a [`RuntimeModuleTable`] instead of
//! failing the build.

mod types;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::descriptor::{EffectiveDescriptor, ModuleDescriptor};
use crate::graph::{Cycle, ModuleGraph};
use crate::runtime::{ModuleHandle, RuntimeModuleTable};
use crate::version::HostVersion;

pub use types::{Resolution, ResolvedModule};

#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("cyclic compile-time dependencies: {}", describe_cycles(.cycles))]
  CyclicDependency { cycles: Vec<Cycle> },

  #[error("unresolved dependencies: {}", describe_missing(.missing))]
  UnresolvedDependency {
    /// Missing module name to the modules that referenced it.
    missing: BTreeMap<String, BTreeSet<String>>,
  },
}

impl ResolveError {
  /// Every module named by this error.
  pub fn modules(&self) -> BTreeSet<String> {
    match self {
      ResolveError::CyclicDependency { cycles } => cycles.iter().flat_map(|c| c.modules.iter().cloned()).collect(),
      ResolveError::UnresolvedDependency { missing } => missing
        .iter()
        .flat_map(|(name, referrers)| std::iter::once(name.clone()).chain(referrers.iter().cloned()))
        .collect(),
    }
  }
}

fn describe_cycles(cycles: &[Cycle]) -> String {
  cycles.iter().map(|c| format!("[{c}]")).collect::<Vec<_>>().join(", ")
}

fn describe_missing(missing: &BTreeMap<String, BTreeSet<String>>) -> String {
  missing
    .iter()
    .map(|(name, referrers)| {
      let referrers: Vec<&str> = referrers.iter().map(String::as_str).collect();
      format!("'{}' (required by {})", name, referrers.join(", "))
    })
    .collect::<Vec<_>>()
    .join(", ")
}

/// Resolve `descriptors` against `host`.
///
/// Module names are expected to be unique; if one repeats, the first
/// occurrence is used.
///
/// # Errors
///
/// - `UnresolvedDependency` listing every unregistered compile-time or
///   include-path name together with the modules that referenced it
/// - `CyclicDependency` listing every compile-time cycle
pub fn resolve<'a>(
  descriptors: impl IntoIterator<Item = &'a ModuleDescriptor>,
  host: &HostVersion,
) -> Result<Resolution, ResolveError> {
  let mut effective: BTreeMap<String, EffectiveDescriptor> = BTreeMap::new();
  for descriptor in descriptors {
    if effective.contains_key(descriptor.name()) {
      warn!(module = %descriptor.name(), "module resolved twice, keeping the first");
      continue;
    }
    effective.insert(descriptor.name().to_string(), descriptor.select(host));
  }

  info!(modules = effective.len(), %host, "resolving modules");

  check_names(&effective)?;

  let graph = ModuleGraph::from_descriptors(effective.values());
  let build_order = graph.build_order()?;
  debug!(order = ?build_order, "build order computed");

  let modules = propagate(&effective, &build_order);
  let runtime = runtime_table(&effective, &build_order);

  let unresolved = runtime.unresolved().count();
  info!(
    modules = build_order.len(),
    runtime = runtime.len(),
    unresolved_runtime = unresolved,
    "resolution complete"
  );

  Ok(Resolution {
    host_version: *host,
    build_order,
    modules,
    runtime,
  })
}

/// Fail if any compile-time or include-path name is not a registered module.
fn check_names(effective: &BTreeMap<String, EffectiveDescriptor>) -> Result<(), ResolveError> {
  let mut missing: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

  for module in effective.values() {
    for name in module.compile_dependencies().chain(&module.private_include_path_modules) {
      if !effective.contains_key(name) {
        missing.entry(name.clone()).or_default().insert(module.name.clone());
      }
    }
  }

  if missing.is_empty() {
    Ok(())
  } else {
    Err(ResolveError::UnresolvedDependency { missing })
  }
}

fn runtime_table(effective: &BTreeMap<String, EffectiveDescriptor>, build_order: &[String]) -> RuntimeModuleTable {
  let mut table = RuntimeModuleTable::default();

  for module in effective.values() {
    for name in &module.runtime_dependencies {
      let handle = build_order.iter().position(|n| n == name).map(|build_index| ModuleHandle {
        name: name.clone(),
        build_index,
        root: effective[name].root.clone(),
      });

      if handle.is_none() {
        warn!(module = %module.name, dependency = %name, "runtime dependency is not a registered module");
      }
      table.record(name, &module.name, handle);
    }
  }

  table
}

/// Compute re-exports, link sets and visible include roots.
///
/// `build_order` lists every module after its compile-time dependencies, so a
/// module's public dependencies always have their re-exports computed first.
fn propagate(
  effective: &BTreeMap<String, EffectiveDescriptor>,
  build_order: &[String],
) -> BTreeMap<String, ResolvedModule> {
  let position: HashMap<&str, usize> = build_order.iter().enumerate().map(|(i, n)| (n.as_str(), i)).collect();

  let mut exports: HashMap<&str, BTreeSet<String>> = HashMap::with_capacity(build_order.len());
  for name in build_order {
    let module = &effective[name];
    let mut set = BTreeSet::new();
    for dep in &module.public_dependencies {
      set.insert(dep.clone());
      set.extend(exports[dep.as_str()].iter().cloned());
    }
    exports.insert(name.as_str(), set);
  }

  let with_exports = |names: &BTreeSet<String>| -> BTreeSet<String> {
    names
      .iter()
      .flat_map(|n| std::iter::once(n.clone()).chain(exports[n.as_str()].iter().cloned()))
      .collect()
  };
  let by_position = |set: BTreeSet<String>| -> Vec<String> {
    let mut names: Vec<String> = set.into_iter().collect();
    names.sort_by_key(|n| position[n.as_str()]);
    names
  };

  let mut resolved = BTreeMap::new();
  for name in build_order {
    let module = &effective[name];

    let mut linked = with_exports(&module.public_dependencies);
    linked.extend(with_exports(&module.private_dependencies));

    let mut visible = linked.clone();
    visible.extend(with_exports(&module.private_include_path_modules));

    let mut include_roots: Vec<PathBuf> = Vec::new();
    let own = module.public_include_roots.iter().chain(&module.private_include_roots);
    let inherited = by_position(visible)
      .into_iter()
      .flat_map(|dep| effective[&dep].public_include_roots.iter());
    for root in own.chain(inherited) {
      if !include_roots.contains(root) {
        include_roots.push(root.clone());
      }
    }

    debug!(
      module = %name,
      links = linked.len(),
      include_roots = include_roots.len(),
      "module resolved"
    );

    resolved.insert(
      name.clone(),
      ResolvedModule {
        name: name.clone(),
        root: module.root.clone(),
        pch: module.pch,
        include_hygiene: module.include_hygiene,
        legacy_include_paths: module.legacy_include_paths,
        public_include_roots: module.public_include_roots.clone(),
        private_include_roots: module.private_include_roots.clone(),
        include_roots,
        public_dependencies: exports[name.as_str()].clone(),
        private_dependencies: module.private_dependencies.clone(),
        link_dependencies: by_position(linked),
        runtime_dependencies: module.runtime_dependencies.clone(),
        private_include_path_modules: module.private_include_path_modules.clone(),
      },
    );
  }

  resolved
}
