//! Shared fixtures for resolution tests.

use std::fs;
use std::path::{Path, PathBuf};

use modgraph_lib::descriptor::{ModuleDecl, ValidateOptions};
use modgraph_lib::discover::discover;
use modgraph_lib::{HostVersion, ModuleRegistry, RegistrationReport};
use tempfile::TempDir;

/// A module source tree on disk.
pub struct ModuleTree {
  pub temp: TempDir,
}

impl ModuleTree {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  /// Write `<name>/<name>.module.toml` and create `dirs` under the module.
  pub fn module(&self, name: &str, dirs: &[&str], toml: &str) -> PathBuf {
    self.module_at(name, name, dirs, toml)
  }

  /// Like [`Self::module`] but under an arbitrary sub-directory.
  pub fn module_at(&self, subdir: &str, name: &str, dirs: &[&str], toml: &str) -> PathBuf {
    let dir = self.path().join(subdir);
    fs::create_dir_all(&dir).unwrap();
    for sub in dirs {
      fs::create_dir_all(dir.join(sub)).unwrap();
    }
    fs::write(dir.join(format!("{name}.module.toml")), toml).unwrap();
    dir
  }

  /// Discover every descriptor and register it with path checks on.
  pub fn registry(&self) -> (ModuleRegistry, RegistrationReport) {
    let discovery = discover(self.path()).unwrap();
    assert!(discovery.errors.is_empty(), "load errors: {:?}", discovery.errors);

    let mut registry = ModuleRegistry::new();
    let report = registry.register_decls(&discovery.decls, &ValidateOptions::default(), true);
    (registry, report)
  }
}

/// The Core, Engine, Editor chain used across tests.
pub fn engine_tree() -> ModuleTree {
  let tree = ModuleTree::new();
  tree.module("Core", &["Public"], "public_include_roots = [\"Public\"]\n");
  tree.module(
    "Engine",
    &["Public", "Private"],
    r#"
public_include_roots = ["Public"]
private_include_roots = ["Private"]
private_dependencies = ["Core"]
"#,
  );
  tree.module(
    "Editor",
    &["Public"],
    r#"
public_include_roots = ["Public"]
private_dependencies = ["Engine"]
public_dependencies = ["Core"]
runtime_dependencies = ["AssetRegistry"]
"#,
  );
  tree
}

/// Register in-memory declarations without touching the filesystem.
pub fn registry_of(decls: &[ModuleDecl]) -> ModuleRegistry {
  let mut registry = ModuleRegistry::new();
  let options = ValidateOptions {
    check_include_paths: false,
  };
  let report = registry.register_decls(decls, &options, false);
  assert!(report.is_ok(), "registration failed: {:?}", report.failed);
  registry
}

pub fn v(s: &str) -> HostVersion {
  s.parse().unwrap()
}
