mod check;
mod lookup;
mod resolve;
mod show;

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use modgraph_lib::discover::discover;
use modgraph_lib::{HostVersion, ModuleRegistry, RegistrationReport, Resolution, ResolveConfig};

use crate::output::{OutputFormat, print_error};

pub use check::cmd_check;
pub use lookup::cmd_lookup;
pub use resolve::cmd_resolve;
pub use show::cmd_show;

/// Global flags shared by every subcommand.
pub struct Flags {
  pub no_path_checks: bool,
  pub output: OutputFormat,
}

/// Environment configuration with command line overrides applied.
fn load_config(host_version: Option<HostVersion>, flags: &Flags) -> Result<ResolveConfig> {
  let mut config = ResolveConfig::from_env().context("Failed to read configuration from environment")?;
  if host_version.is_some() {
    config.host_version = host_version;
  }
  if flags.no_path_checks {
    config.check_include_paths = false;
  }
  Ok(config)
}

/// A registry built from every descriptor under `source`.
struct Loaded {
  registry: ModuleRegistry,
  report: RegistrationReport,
  /// Descriptor files that could not be read or parsed.
  load_errors: Vec<String>,
}

impl Loaded {
  fn error_count(&self) -> usize {
    self.load_errors.len() + self.report.failed.len()
  }

  fn error_messages(&self) -> Vec<String> {
    self
      .load_errors
      .iter()
      .cloned()
      .chain(self.report.failed.iter().map(|e| e.to_string()))
      .collect()
  }
}

fn load(source: &Path, config: &ResolveConfig) -> Result<Loaded> {
  debug!(source = %source.display(), check_include_paths = config.check_include_paths, "loading descriptors");
  let discovery =
    discover(source).with_context(|| format!("Failed to search {} for module descriptors", source.display()))?;

  let mut registry = ModuleRegistry::new();
  let report = registry.register_decls(&discovery.decls, &config.validate_options(), config.parallel_validation);

  Ok(Loaded {
    registry,
    report,
    load_errors: discovery.errors.iter().map(|e| e.to_string()).collect(),
  })
}

/// Load, require every descriptor to be valid, and resolve.
fn load_and_resolve(source: &Path, host_version: Option<HostVersion>, flags: &Flags) -> Result<Resolution> {
  let config = load_config(host_version, flags)?;
  let host = config.host_version()?;
  let loaded = load(source, &config)?;

  if loaded.error_count() > 0 {
    for message in loaded.error_messages() {
      print_error(&message);
    }
    bail!("{} module descriptor(s) are invalid", loaded.error_count());
  }

  loaded
    .registry
    .resolve(&host)
    .with_context(|| format!("Failed to resolve modules for host {}", host))
}
