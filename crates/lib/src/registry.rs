//! The registration phase.
//!
//! A [`ModuleRegistry`] is owned by the caller for one build invocation.
//! Descriptors are validated (in parallel when asked), then registered one at a
//! time in input order so the first module to claim a name always keeps it.

use std::collections::HashMap;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ResolveConfig};
use crate::descriptor::{DescriptorError, ModuleDecl, ModuleDescriptor, ValidateOptions};
use crate::resolve::{self, Resolution, ResolveError};
use crate::version::HostVersion;

#[derive(Debug, Error)]
pub enum RegistryError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Resolve(#[from] ResolveError),
}

/// Outcome of [`ModuleRegistry::register_decls`].
#[derive(Debug, Default)]
pub struct RegistrationReport {
  /// Names registered by this call, in input order.
  pub registered: Vec<String>,

  /// Declarations that failed validation or registration, in input order.
  pub failed: Vec<DescriptorError>,
}

impl RegistrationReport {
  pub fn is_ok(&self) -> bool {
    self.failed.is_empty()
  }
}

#[derive(Debug, Default)]
pub struct ModuleRegistry {
  modules: Vec<ModuleDescriptor>,
  index: HashMap<String, usize>,
}

impl ModuleRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a validated descriptor.
  ///
  /// # Errors
  ///
  /// Returns `DuplicateModule` if a module with the same name is already
  /// registered. The existing module is left untouched.
  pub fn register(&mut self, descriptor: ModuleDescriptor) -> Result<(), DescriptorError> {
    if self.index.contains_key(descriptor.name()) {
      return Err(DescriptorError::DuplicateModule {
        name: descriptor.name().to_string(),
      });
    }

    debug!(module = %descriptor.name(), "registered module");
    self.index.insert(descriptor.name().to_string(), self.modules.len());
    self.modules.push(descriptor);
    Ok(())
  }

  /// Validate and register a batch of declarations.
  ///
  /// Validation has no cross-module dependency and runs on the rayon pool when
  /// `parallel` is set. Registration is always serial, in input order.
  pub fn register_decls(
    &mut self,
    decls: &[ModuleDecl],
    options: &ValidateOptions,
    parallel: bool,
  ) -> RegistrationReport {
    let validated: Vec<Result<ModuleDescriptor, DescriptorError>> = if parallel {
      decls.par_iter().map(|decl| ModuleDescriptor::from_decl(decl, options)).collect()
    } else {
      decls.iter().map(|decl| ModuleDescriptor::from_decl(decl, options)).collect()
    };

    let mut report = RegistrationReport::default();
    for result in validated {
      match result.and_then(|descriptor| {
        let name = descriptor.name().to_string();
        self.register(descriptor).map(|()| name)
      }) {
        Ok(name) => report.registered.push(name),
        Err(err) => {
          warn!(module = %err.module(), error = %err, "module rejected");
          report.failed.push(err);
        }
      }
    }

    info!(
      registered = report.registered.len(),
      failed = report.failed.len(),
      "registration complete"
    );
    report
  }

  pub fn get(&self, name: &str) -> Option<&ModuleDescriptor> {
    self.index.get(name).map(|&i| &self.modules[i])
  }

  pub fn contains(&self, name: &str) -> bool {
    self.index.contains_key(name)
  }

  /// Registered modules in registration order.
  pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
    self.modules.iter()
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  /// Resolve every registered module against `host`.
  pub fn resolve(&self, host: &HostVersion) -> Result<Resolution, ResolveError> {
    resolve::resolve(&self.modules, host)
  }

  /// Resolve against the host version carried by `config`.
  pub fn resolve_with(&self, config: &ResolveConfig) -> Result<Resolution, RegistryError> {
    let host = config.host_version()?;
    Ok(self.resolve(&host)?)
  }
}
