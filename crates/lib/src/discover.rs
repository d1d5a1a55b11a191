//! Descriptor discovery.
//!
//! Walks a source tree for `<Name>.module.toml` files and loads each into a
//! [`ModuleDecl`]. The module root is the directory holding the file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::consts::DESCRIPTOR_SUFFIX;
use crate::descriptor::ModuleDecl;

#[derive(Debug, Error)]
pub enum LoadError {
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("failed to walk {}: {message}", path.display())]
  Walk { path: PathBuf, message: String },
}

/// Descriptors found under one source directory.
#[derive(Debug, Default)]
pub struct Discovery {
  /// Loaded declarations, in path order.
  pub decls: Vec<ModuleDecl>,

  /// Files that could not be read or parsed.
  pub errors: Vec<LoadError>,
}

/// Load one descriptor file.
///
/// An empty `name` defaults to the file name without the descriptor suffix.
pub fn load_descriptor(path: &Path) -> Result<ModuleDecl, LoadError> {
  let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let mut decl: ModuleDecl = toml::from_str(&content).map_err(|source| LoadError::Parse {
    path: path.to_path_buf(),
    source,
  })?;

  let stem = descriptor_stem(path);
  match stem {
    Some(stem) if decl.name.is_empty() => decl.name = stem.to_string(),
    Some(stem) if decl.name != stem => {
      warn!(path = %path.display(), name = %decl.name, "module name does not match descriptor file name");
    }
    _ => {}
  }

  decl.root = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
    _ => PathBuf::from("."),
  };

  debug!(module = %decl.name, path = %path.display(), "loaded descriptor");
  Ok(decl)
}

/// Find and load every descriptor under `dir`.
///
/// Files are visited in file-name order so the result does not depend on the
/// filesystem. A file that fails to load is recorded in [`Discovery::errors`]
/// and does not stop the walk.
///
/// # Errors
///
/// Returns `Walk` if `dir` itself cannot be read.
pub fn discover(dir: &Path) -> Result<Discovery, LoadError> {
  let mut discovery = Discovery::default();

  for entry in WalkDir::new(dir).sort_by_file_name() {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) if e.depth() == 0 => {
        return Err(LoadError::Walk {
          path: dir.to_path_buf(),
          message: e.to_string(),
        });
      }
      Err(e) => {
        discovery.errors.push(LoadError::Walk {
          path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
          message: e.to_string(),
        });
        continue;
      }
    };

    if !entry.file_type().is_file() || descriptor_stem(entry.path()).is_none() {
      continue;
    }

    match load_descriptor(entry.path()) {
      Ok(decl) => discovery.decls.push(decl),
      Err(e) => {
        warn!(error = %e, "skipping descriptor");
        discovery.errors.push(e);
      }
    }
  }

  info!(
    dir = %dir.display(),
    found = discovery.decls.len(),
    failed = discovery.errors.len(),
    "discovered descriptors"
  );
  Ok(discovery)
}

/// `Editor` for `.../Editor.module.toml`, `None` for any other file.
fn descriptor_stem(path: &Path) -> Option<&str> {
  path
    .file_name()
    .and_then(|name| name.to_str())
    .and_then(|name| name.strip_suffix(DESCRIPTOR_SUFFIX))
    .filter(|stem| !stem.is_empty())
}
