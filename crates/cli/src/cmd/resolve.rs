//! Resolve command implementation.
//!
//! Prints the build order, runtime table summary and resolution fingerprint.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use modgraph_lib::HostVersion;
use modgraph_lib::util::hash::Hashable;

use crate::cmd::{Flags, load_and_resolve};
use crate::output::{format_duration, print_json, print_stat, print_success, print_warning};

pub fn cmd_resolve(source: &Path, host_version: Option<HostVersion>, flags: &Flags) -> Result<()> {
  let start = Instant::now();

  let resolution = load_and_resolve(source, host_version, flags)?;
  let fingerprint = resolution.fingerprint().context("Failed to fingerprint resolution")?;
  let unresolved: Vec<&str> = resolution.runtime().unresolved().collect();

  if flags.output.is_json() {
    print_json(&serde_json::json!({
      "fingerprint": fingerprint,
      "resolution": resolution,
    }))?;
    return Ok(());
  }

  print_success(&format!(
    "Resolved {} module(s) for host {}",
    resolution.len(),
    resolution.host_version()
  ));

  if !resolution.is_empty() {
    println!();
    println!("Build order:");
    for (idx, name) in resolution.build_order().iter().enumerate() {
      println!("  {:>3}. {}", idx + 1, name);
    }
    println!();
  }

  print_stat("Runtime modules", &resolution.runtime().len().to_string());
  for name in &unresolved {
    print_warning(&format!("Runtime module '{}' is not registered", name));
  }
  print_stat("Fingerprint", &fingerprint.to_string());
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}
