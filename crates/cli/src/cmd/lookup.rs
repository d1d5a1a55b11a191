use std::path::Path;

use anyhow::{Result, bail};

use modgraph_lib::HostVersion;

use crate::cmd::{Flags, load_and_resolve};
use crate::output::{format_list, print_error, print_json, print_stat, print_success, symbols};

pub fn cmd_lookup(name: &str, source: &Path, host_version: Option<HostVersion>, flags: &Flags) -> Result<()> {
  let resolution = load_and_resolve(source, host_version, flags)?;
  let runtime = resolution.runtime();

  let handle = match runtime.lookup(name) {
    Ok(handle) => handle,
    Err(e) => {
      if let Some(requesters) = runtime.requested_by(name) {
        print_error(&format!("'{}' is requested by {} but not registered", name, format_list(requesters)));
      }
      bail!(e);
    }
  };

  if flags.output.is_json() {
    return print_json(&handle);
  }

  print_success(&format!("{} {} {}", handle.name, symbols::ARROW, handle.root.display()));
  print_stat("Build position", &(handle.build_index + 1).to_string());
  if let Some(requesters) = runtime.requested_by(name) {
    print_stat("Requested by", &format_list(requesters));
  }

  Ok(())
}
