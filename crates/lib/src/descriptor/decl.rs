//! Authored module declarations.
//!
//! These types mirror the descriptor file format one to one and carry no
//! guarantees; see [`ModuleDescriptor::from_decl`](super::ModuleDescriptor::from_decl)
//! for the checks that turn them into a descriptor.
//!
//! ```toml
//! name = "VoxelEditor"
//! pch = "explicit-or-shared"
//! include_hygiene = true
//! public_include_roots = ["Public"]
//! private_dependencies = ["Core", "Engine"]
//! runtime_dependencies = ["AssetRegistry"]
//!
//! [[regions]]
//! [[regions.branches]]
//! when = ">=4.24"
//! body = { private_dependencies = ["ToolMenus"] }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::PchMode;

/// One module as declared by its author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleDecl {
  pub name: String,

  /// Directory the include roots are relative to. Set from the descriptor
  /// file's location during discovery.
  #[serde(skip)]
  pub root: PathBuf,

  pub pch: Option<PchMode>,
  pub include_hygiene: Option<bool>,
  pub legacy_include_paths: Option<bool>,

  pub public_include_roots: Vec<PathBuf>,
  pub private_include_roots: Vec<PathBuf>,
  pub public_dependencies: Vec<String>,
  pub private_dependencies: Vec<String>,
  pub runtime_dependencies: Vec<String>,
  pub private_include_path_modules: Vec<String>,

  pub regions: Vec<RegionDecl>,
}

/// A version-conditioned region: ordered branches, at most one active per build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionDecl {
  pub branches: Vec<BranchDecl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BranchDecl {
  /// Predicate source, e.g. `">=4.24, <4.26"` or `"otherwise"`.
  pub when: String,
  #[serde(default)]
  pub body: BodyDecl,
}

/// Fields a region branch may contribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BodyDecl {
  pub pch: Option<PchMode>,
  pub include_hygiene: Option<bool>,
  pub legacy_include_paths: Option<bool>,

  pub public_include_roots: Vec<PathBuf>,
  pub private_include_roots: Vec<PathBuf>,
  pub public_dependencies: Vec<String>,
  pub private_dependencies: Vec<String>,
  pub runtime_dependencies: Vec<String>,
  pub private_include_path_modules: Vec<String>,
}

macro_rules! list_builders {
  ($($method:ident => $field:ident: $ty:ty),* $(,)?) => {
    $(
      pub fn $method(mut self, value: impl Into<$ty>) -> Self {
        self.$field.push(value.into());
        self
      }
    )*
  };
}

impl ModuleDecl {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Default::default()
    }
  }

  pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
    self.root = root.into();
    self
  }

  pub fn with_pch(mut self, pch: PchMode) -> Self {
    self.pch = Some(pch);
    self
  }

  pub fn with_include_hygiene(mut self, enabled: bool) -> Self {
    self.include_hygiene = Some(enabled);
    self
  }

  pub fn with_legacy_include_paths(mut self, enabled: bool) -> Self {
    self.legacy_include_paths = Some(enabled);
    self
  }

  pub fn with_region(mut self, region: RegionDecl) -> Self {
    self.regions.push(region);
    self
  }

  list_builders! {
    public_include => public_include_roots: PathBuf,
    private_include => private_include_roots: PathBuf,
    public_dep => public_dependencies: String,
    private_dep => private_dependencies: String,
    runtime_dep => runtime_dependencies: String,
    include_path_module => private_include_path_modules: String,
  }

  /// The unconditional part of the declaration, in region-body form.
  pub fn base(&self) -> BodyDecl {
    BodyDecl {
      pch: self.pch,
      include_hygiene: self.include_hygiene,
      legacy_include_paths: self.legacy_include_paths,
      public_include_roots: self.public_include_roots.clone(),
      private_include_roots: self.private_include_roots.clone(),
      public_dependencies: self.public_dependencies.clone(),
      private_dependencies: self.private_dependencies.clone(),
      runtime_dependencies: self.runtime_dependencies.clone(),
      private_include_path_modules: self.private_include_path_modules.clone(),
    }
  }
}

impl RegionDecl {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn branch(mut self, when: impl Into<String>, body: BodyDecl) -> Self {
    self.branches.push(BranchDecl {
      when: when.into(),
      body,
    });
    self
  }

  /// A region with a single branch.
  pub fn when(when: impl Into<String>, body: BodyDecl) -> Self {
    Self::new().branch(when, body)
  }
}

impl BodyDecl {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_pch(mut self, pch: PchMode) -> Self {
    self.pch = Some(pch);
    self
  }

  pub fn with_include_hygiene(mut self, enabled: bool) -> Self {
    self.include_hygiene = Some(enabled);
    self
  }

  pub fn with_legacy_include_paths(mut self, enabled: bool) -> Self {
    self.legacy_include_paths = Some(enabled);
    self
  }

  list_builders! {
    public_include => public_include_roots: PathBuf,
    private_include => private_include_roots: PathBuf,
    public_dep => public_dependencies: String,
    private_dep => private_dependencies: String,
    runtime_dep => runtime_dependencies: String,
    include_path_module => private_include_path_modules: String,
  }
}
