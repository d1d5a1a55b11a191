use std::path::Path;

use anyhow::{Result, anyhow};

use modgraph_lib::HostVersion;

use crate::cmd::{Flags, load_and_resolve};
use crate::output::{format_list, print_json, print_stat, print_success};

pub fn cmd_show(module: &str, source: &Path, host_version: Option<HostVersion>, flags: &Flags) -> Result<()> {
  let resolution = load_and_resolve(source, host_version, flags)?;
  let resolved = resolution
    .module(module)
    .ok_or_else(|| anyhow!("Module '{}' is not registered", module))?;

  if flags.output.is_json() {
    return print_json(resolved);
  }

  print_success(&format!("{} (host {})", resolved.name, resolution.host_version()));
  print_stat("Root", &resolved.root.display().to_string());
  print_stat("Precompiled headers", resolved.pch.as_str());
  print_stat("Include hygiene", &resolved.include_hygiene.to_string());
  print_stat("Legacy include paths", &resolved.legacy_include_paths.to_string());
  print_stat("Public dependencies", &format_list(&resolved.public_dependencies));
  print_stat("Private dependencies", &format_list(&resolved.private_dependencies));
  print_stat("Links", &format_list(&resolved.link_dependencies));
  print_stat("Runtime dependencies", &format_list(&resolved.runtime_dependencies));
  print_stat("Include-path modules", &format_list(&resolved.private_include_path_modules));

  println!();
  println!("Include roots:");
  for root in &resolved.include_roots {
    println!("  {}", root.display());
  }

  Ok(())
}
