//! Test utilities for modgraph-lib.
//!
//! Helpers for laying out module trees on disk.

use std::fs;
use std::path::{Path, PathBuf};

/// Create `<root>/<name>/` with the given include directories and a
/// `<name>.module.toml` holding `body`. Returns the module directory.
pub fn write_module(root: &Path, name: &str, dirs: &[&str], body: &str) -> PathBuf {
  let dir = root.join(name);
  fs::create_dir_all(&dir).unwrap();
  for sub in dirs {
    fs::create_dir_all(dir.join(sub)).unwrap();
  }
  fs::write(dir.join(format!("{name}.module.toml")), body).unwrap();
  dir
}
