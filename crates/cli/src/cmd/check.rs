//! Check command implementation.
//!
//! Validates every descriptor under a source tree without resolving.

use std::path::Path;

use anyhow::{Result, bail};

use crate::cmd::{Flags, load, load_config};
use crate::output::{print_error, print_info, print_json, print_success};

pub fn cmd_check(source: &Path, flags: &Flags) -> Result<()> {
  let config = load_config(None, flags)?;
  let loaded = load(source, &config)?;
  let errors = loaded.error_messages();

  if flags.output.is_json() {
    print_json(&serde_json::json!({
      "registered": loaded.report.registered,
      "errors": errors,
    }))?;
  } else if errors.is_empty() {
    if loaded.registry.is_empty() {
      print_info(&format!("No module descriptors found in {}", source.display()));
    } else {
      print_success(&format!("{} module descriptor(s) valid", loaded.registry.len()));
    }
  } else {
    for message in &errors {
      print_error(message);
    }
  }

  if !errors.is_empty() {
    bail!("{} module descriptor(s) are invalid", errors.len());
  }
  Ok(())
}
