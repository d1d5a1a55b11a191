//! Construction-time validation.
//!
//! Turns a [`ModuleDecl`] into a [`ModuleDescriptor`], failing fast with a
//! [`DescriptorError`] that names the module and the offending field. Checks
//! here never look at other modules: whether dependency names exist is decided
//! later, during resolution.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::decl::{BodyDecl, ModuleDecl};
use super::types::{ConditionalRegion, DescriptorBody, ModuleDescriptor, RegionBranch};
use crate::version::{VersionPredicate, VersionRange};

/// Errors raised while constructing or registering a single descriptor.
///
/// All of these are deterministic given the same declaration; retrying without
/// changing the input is pointless.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
  #[error("invalid module name '{name}': {reason}")]
  InvalidModuleName { name: String, reason: String },

  #[error("module '{name}' is already registered")]
  DuplicateModule { name: String },

  #[error("module '{module}': include root '{path}' in {field} {reason}")]
  InvalidIncludePath {
    module: String,
    field: String,
    path: String,
    reason: String,
  },

  #[error("module '{module}' lists itself in {field}")]
  SelfDependency { module: String, field: String },

  #[error("module '{module}': invalid module name '{name}' in {field}: {reason}")]
  InvalidDependencyName {
    module: String,
    field: String,
    name: String,
    reason: String,
  },

  #[error("module '{module}': malformed predicate '{predicate}' in {field}: {reason}")]
  MalformedPredicate {
    module: String,
    field: String,
    predicate: String,
    reason: String,
  },
}

impl DescriptorError {
  /// The module the error belongs to.
  pub fn module(&self) -> &str {
    match self {
      DescriptorError::InvalidModuleName { name, .. } | DescriptorError::DuplicateModule { name } => name,
      DescriptorError::InvalidIncludePath { module, .. }
      | DescriptorError::SelfDependency { module, .. }
      | DescriptorError::InvalidDependencyName { module, .. }
      | DescriptorError::MalformedPredicate { module, .. } => module,
    }
  }
}

/// Options that control how strictly declarations are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
  /// Require every include root to exist as a directory under the module root.
  pub check_include_paths: bool,
}

impl Default for ValidateOptions {
  fn default() -> Self {
    Self {
      check_include_paths: true,
    }
  }
}

impl ModuleDescriptor {
  /// Validate a declaration and build an immutable descriptor from it.
  ///
  /// # Errors
  ///
  /// - `InvalidModuleName` if the name is empty or not an identifier
  /// - `InvalidIncludePath` if an include root escapes the module root, or is
  ///   missing while `options.check_include_paths` is set
  /// - `InvalidDependencyName` / `SelfDependency` for bad dependency entries
  /// - `MalformedPredicate` for unparsable or overlapping region predicates
  pub fn from_decl(decl: &ModuleDecl, options: &ValidateOptions) -> Result<Self, DescriptorError> {
    if let Err(reason) = check_identifier(&decl.name) {
      return Err(DescriptorError::InvalidModuleName {
        name: decl.name.clone(),
        reason: reason.to_string(),
      });
    }

    let checker = Checker {
      module: &decl.name,
      root: &decl.root,
      options,
    };

    let base = checker.body(&decl.base(), "")?;

    let mut regions = Vec::with_capacity(decl.regions.len());
    for (region_idx, region) in decl.regions.iter().enumerate() {
      let prefix = format!("regions[{}]", region_idx);
      if region.branches.is_empty() {
        return Err(DescriptorError::MalformedPredicate {
          module: decl.name.clone(),
          field: prefix,
          predicate: String::new(),
          reason: "region declares no branches".to_string(),
        });
      }

      let mut branches: Vec<RegionBranch> = Vec::with_capacity(region.branches.len());
      for (branch_idx, branch) in region.branches.iter().enumerate() {
        let field = format!("{}.branches[{}]", prefix, branch_idx);
        let malformed = |reason: String| DescriptorError::MalformedPredicate {
          module: decl.name.clone(),
          field: format!("{}.when", field),
          predicate: branch.when.clone(),
          reason,
        };

        let when = VersionPredicate::parse(&branch.when).map_err(|e| malformed(e.to_string()))?;

        match &when {
          VersionPredicate::Otherwise if branch_idx + 1 != region.branches.len() => {
            return Err(malformed("'otherwise' must be the last branch of its region".to_string()));
          }
          VersionPredicate::Range(range) => {
            if let Some((other_idx, other)) = first_overlap(&branches, range) {
              return Err(malformed(format!("overlaps branch {} ('{}')", other_idx, other)));
            }
          }
          VersionPredicate::Otherwise => {}
        }

        let body = checker.body(&branch.body, &format!("{}.body.", field))?;
        branches.push(RegionBranch { when, body });
      }

      regions.push(ConditionalRegion { branches });
    }

    debug!(module = %decl.name, regions = regions.len(), "validated module descriptor");

    Ok(ModuleDescriptor {
      name: decl.name.clone(),
      root: decl.root.clone(),
      pch: decl.pch.unwrap_or_default(),
      include_hygiene: decl.include_hygiene.unwrap_or(false),
      legacy_include_paths: decl.legacy_include_paths.unwrap_or(false),
      base: DescriptorBody {
        pch: None,
        include_hygiene: None,
        legacy_include_paths: None,
        ..base
      },
      regions,
    })
  }
}

fn first_overlap<'a>(branches: &'a [RegionBranch], range: &VersionRange) -> Option<(usize, &'a VersionRange)> {
  branches.iter().enumerate().find_map(|(idx, branch)| match &branch.when {
    VersionPredicate::Range(other) if other.overlaps(range) => Some((idx, other)),
    _ => None,
  })
}

/// Per-module validation context.
struct Checker<'a> {
  module: &'a str,
  root: &'a Path,
  options: &'a ValidateOptions,
}

impl Checker<'_> {
  fn body(&self, body: &BodyDecl, prefix: &str) -> Result<DescriptorBody, DescriptorError> {
    Ok(DescriptorBody {
      pch: body.pch,
      include_hygiene: body.include_hygiene,
      legacy_include_paths: body.legacy_include_paths,
      public_include_roots: self.include_roots(&body.public_include_roots, &format!("{}public_include_roots", prefix))?,
      private_include_roots: self
        .include_roots(&body.private_include_roots, &format!("{}private_include_roots", prefix))?,
      public_dependencies: self.names(&body.public_dependencies, &format!("{}public_dependencies", prefix))?,
      private_dependencies: self.names(&body.private_dependencies, &format!("{}private_dependencies", prefix))?,
      runtime_dependencies: self.names(&body.runtime_dependencies, &format!("{}runtime_dependencies", prefix))?,
      private_include_path_modules: self.names(
        &body.private_include_path_modules,
        &format!("{}private_include_path_modules", prefix),
      )?,
    })
  }

  fn names(&self, names: &[String], field: &str) -> Result<BTreeSet<String>, DescriptorError> {
    let mut out = BTreeSet::new();
    for name in names {
      if let Err(reason) = check_identifier(name) {
        return Err(DescriptorError::InvalidDependencyName {
          module: self.module.to_string(),
          field: field.to_string(),
          name: name.clone(),
          reason: reason.to_string(),
        });
      }
      if name == self.module {
        return Err(DescriptorError::SelfDependency {
          module: self.module.to_string(),
          field: field.to_string(),
        });
      }
      if !out.insert(name.clone()) {
        warn!(module = %self.module, field, dependency = %name, "duplicate entry ignored");
      }
    }
    Ok(out)
  }

  fn include_roots(&self, paths: &[PathBuf], field: &str) -> Result<Vec<PathBuf>, DescriptorError> {
    let root = normalize_lexically(self.root);
    let mut out: Vec<PathBuf> = Vec::with_capacity(paths.len());

    for path in paths {
      let invalid = |reason: &str| DescriptorError::InvalidIncludePath {
        module: self.module.to_string(),
        field: field.to_string(),
        path: path.display().to_string(),
        reason: reason.to_string(),
      };

      let resolved = normalize_lexically(&root.join(path));
      let escapes = match resolved.strip_prefix(&root) {
        Ok(rel) => rel.components().any(|c| c == Component::ParentDir),
        Err(_) => true,
      };
      if escapes {
        return Err(invalid("escapes the module root"));
      }

      if self.options.check_include_paths {
        if !on_disk(&resolved).is_dir() {
          return Err(invalid("does not exist"));
        }
        // Lexically inside, but a symlink may still point elsewhere.
        let real_root = dunce::canonicalize(on_disk(&root)).map_err(|_| invalid("has an unreadable module root"))?;
        let real_path = dunce::canonicalize(on_disk(&resolved)).map_err(|_| invalid("cannot be canonicalized"))?;
        if !real_path.starts_with(&real_root) {
          return Err(invalid("resolves outside the module root"));
        }
      }

      if out.contains(&resolved) {
        warn!(module = %self.module, field, path = %resolved.display(), "duplicate include root ignored");
        continue;
      }
      out.push(resolved);
    }

    Ok(out)
  }
}

/// A lexically normalized path as the filesystem expects it; `.` normalizes to nothing.
fn on_disk(path: &Path) -> &Path {
  if path.as_os_str().is_empty() {
    Path::new(".")
  } else {
    path
  }
}

/// Check that `name` is an identifier: ASCII letter or `_`, then ASCII alphanumerics or `_`.
fn check_identifier(name: &str) -> Result<(), &'static str> {
  let mut chars = name.chars();
  let Some(first) = chars.next() else {
    return Err("name cannot be empty");
  };
  if name.chars().any(char::is_whitespace) {
    return Err("name cannot contain whitespace");
  }
  if !(first.is_ascii_alphabetic() || first == '_') {
    return Err("name must start with a letter or underscore");
  }
  if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
    return Err("name may only contain letters, digits and underscores");
  }
  Ok(())
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// Leading `..` components that cannot be popped are kept.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match out.components().next_back() {
        Some(Component::Normal(_)) => {
          out.pop();
        }
        Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
        _ => out.push(".."),
      },
      other => out.push(other.as_os_str()),
    }
  }
  out
}
