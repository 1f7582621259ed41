mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::{OutputFormat, print_error};

/// porter - build ports from a source-based ports tree
#[derive(Parser)]
#[command(name = "porter")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Configuration file (default: PORTER_CONFIG or <config dir>/porter/porter.toml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

/// Ports to work on and how to confirm them.
#[derive(Args, Debug, Clone)]
pub struct PortArgs {
  /// Port specifiers: name[-version[-revision]]
  #[arg(required_unless_present = "ports_file", conflicts_with = "ports_file")]
  pub specifiers: Vec<String>,

  /// Read port specifiers from a file, one per line
  #[arg(long)]
  pub ports_file: Option<PathBuf>,

  /// Answer yes to every confirmation
  #[arg(short, long)]
  pub yes: bool,

  /// Show the description of each port
  #[arg(long)]
  pub about: bool,
}

/// Options handed to every stage.
#[derive(Args, Debug, Clone)]
pub struct StageArgs {
  /// Clean the work directory before building
  #[arg(long)]
  pub clean: bool,

  /// Do not apply patches (implies no build and no packaging)
  #[arg(long)]
  pub no_patch: bool,

  /// Redo stages even when their output looks current
  #[arg(short, long)]
  pub force: bool,

  /// Reduce stage output
  #[arg(short, long)]
  pub quiet: bool,

  /// Build outside a chroot
  #[arg(long)]
  pub no_chroot: bool,

  /// Number of parallel jobs passed to each build
  #[arg(short, long, default_value_t = 1)]
  pub jobs: usize,
}

#[derive(Subcommand)]
enum Commands {
  /// Build ports together with the prerequisites they still need
  Build {
    #[command(flatten)]
    ports: PortArgs,

    #[command(flatten)]
    stages: StageArgs,

    /// Build but do not create packages
    #[arg(long)]
    no_package: bool,

    /// Build only the named ports, without their prerequisites
    #[arg(long)]
    no_dependencies: bool,
  },

  /// Download, unpack and patch ports without building them
  Fetch {
    #[command(flatten)]
    ports: PortArgs,

    #[command(flatten)]
    stages: StageArgs,
  },

  /// Show the architecture profile and build variables
  Info {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },
}

fn main() {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::from_default_env()
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let config = cli.config.as_deref();
  let result = match cli.command {
    Commands::Build {
      ports,
      stages,
      no_package,
      no_dependencies,
    } => cmd::cmd_build(config, &ports, &stages, no_package, no_dependencies),
    Commands::Fetch { ports, stages } => cmd::cmd_fetch(config, &ports, &stages),
    Commands::Info { output } => cmd::cmd_info(config, output),
  };

  if let Err(e) = result {
    print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}
