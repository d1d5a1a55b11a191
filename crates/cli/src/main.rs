mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use modgraph_lib::HostVersion;

use crate::cmd::{cmd_check, cmd_lookup, cmd_resolve, cmd_show};
use crate::output::OutputFormat;

/// modgraph - resolve module-build descriptors into a build order
#[derive(Parser)]
#[command(name = "modgraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Do not require declared include roots to exist on disk
  #[arg(long, global = true)]
  no_path_checks: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Validate every descriptor under a source tree
  Check {
    /// Directory to search for *.module.toml files
    #[arg(default_value = ".")]
    source: PathBuf,
  },

  /// Resolve every module and print the build order
  Resolve {
    /// Directory to search for *.module.toml files
    #[arg(default_value = ".")]
    source: PathBuf,

    /// Host version to resolve against (overrides MODGRAPH_HOST_VERSION)
    #[arg(long)]
    host_version: Option<HostVersion>,
  },

  /// Show one module's effective settings
  Show {
    /// Module name
    module: String,

    /// Directory to search for *.module.toml files
    #[arg(default_value = ".")]
    source: PathBuf,

    /// Host version to resolve against (overrides MODGRAPH_HOST_VERSION)
    #[arg(long)]
    host_version: Option<HostVersion>,
  },

  /// Look up a runtime-only module by name
  Lookup {
    /// Runtime module name
    name: String,

    /// Directory to search for *.module.toml files
    #[arg(default_value = ".")]
    source: PathBuf,

    /// Host version to resolve against (overrides MODGRAPH_HOST_VERSION)
    #[arg(long)]
    host_version: Option<HostVersion>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let flags = cmd::Flags {
    no_path_checks: cli.no_path_checks,
    output: cli.output,
  };

  match cli.command {
    Commands::Check { source } => cmd_check(&source, &flags),
    Commands::Resolve { source, host_version } => cmd_resolve(&source, host_version, &flags),
    Commands::Show {
      module,
      source,
      host_version,
    } => cmd_show(&module, &source, host_version, &flags),
    Commands::Lookup {
      name,
      source,
      host_version,
    } => cmd_lookup(&name, &source, host_version, &flags),
  }
}
