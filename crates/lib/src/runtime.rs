//! Runtime-only module lookup.
//!
//! Runtime dependencies are not linked. A dependent looks them up by name when
//! it starts, so a name that no registered module answers to is tolerated at
//! resolution time and only fails when it is looked up.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
  #[error("runtime module '{name}' not found")]
  NotFound { name: String },
}

/// A loadable module, as handed out by [`RuntimeModuleTable::lookup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleHandle {
  pub name: String,
  /// Position of the module in the build order.
  pub build_index: usize,
  pub root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct RuntimeEntry {
  handle: Option<ModuleHandle>,
  requested_by: BTreeSet<String>,
}

/// Every runtime-only dependency named by a resolved module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuntimeModuleTable {
  entries: BTreeMap<String, RuntimeEntry>,
}

impl RuntimeModuleTable {
  pub(crate) fn record(&mut self, name: &str, requested_by: &str, handle: Option<ModuleHandle>) {
    let entry = self.entries.entry(name.to_string()).or_insert_with(|| RuntimeEntry {
      handle,
      requested_by: BTreeSet::new(),
    });
    entry.requested_by.insert(requested_by.to_string());
  }

  /// Look up a runtime module by name.
  ///
  /// Only names some resolved module declared as a runtime dependency are
  /// known here.
  pub fn lookup(&self, name: &str) -> Result<ModuleHandle, LookupError> {
    self
      .entries
      .get(name)
      .and_then(|entry| entry.handle.clone())
      .ok_or_else(|| LookupError::NotFound { name: name.to_string() })
  }

  /// Modules that declared `name` as a runtime dependency.
  pub fn requested_by(&self, name: &str) -> Option<&BTreeSet<String>> {
    self.entries.get(name).map(|entry| &entry.requested_by)
  }

  /// Runtime names that no registered module answers to.
  pub fn unresolved(&self) -> impl Iterator<Item = &str> {
    self
      .entries
      .iter()
      .filter(|(_, entry)| entry.handle.is_none())
      .map(|(name, _)| name.as_str())
  }

  /// All runtime names, resolved or not, in ascending order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
