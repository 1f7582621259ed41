mod build;
mod fetch;
mod info;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use porter_lib::backend::CommandBackend;
use porter_lib::build::BuildOptions;
use porter_lib::catalog::JsonCatalog;
use porter_lib::config::Config;
use porter_lib::gate::Confirmer;
use porter_lib::platform::{ArchitectureContext, KnownTriples, PackageCommandProbe};
use porter_lib::port::{PortSpecifier, ResolvedPort};
use porter_lib::session::Session;

use crate::output::{print_info, print_stat};
use crate::{PortArgs, StageArgs};

pub use build::cmd_build;
pub use fetch::cmd_fetch;
pub use info::cmd_info;

/// Everything loaded once per invocation.
pub struct PortTree {
  pub config: Config,
  pub context: ArchitectureContext,
  pub catalog: JsonCatalog,
  pub backend: CommandBackend,
}

impl PortTree {
  pub fn open(config_path: Option<&Path>) -> Result<Self> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    let context = detect_context(&config)?;
    let catalog = JsonCatalog::load(&config.repository_path(), &config.catalog_path())
      .context("Failed to load port catalog")?;
    let backend = CommandBackend::new(&config.backend);

    debug!(
      tree = ?config.tree_path,
      ports = catalog.len(),
      backend = ?backend.program(),
      "port tree opened"
    );

    Ok(Self {
      config,
      context,
      catalog,
      backend,
    })
  }

  pub fn session<'a>(&'a self, confirmer: &'a dyn Confirmer, yes: bool) -> Session<'a> {
    Session::new(
      &self.catalog,
      &self.backend,
      confirmer,
      self.context.clone(),
      self.config.output_paths(),
    )
    .with_policy(self.config.gate_policy(yes))
  }
}

pub fn detect_context(config: &Config) -> Result<ArchitectureContext> {
  let probe = PackageCommandProbe::new(&config.system_package);
  ArchitectureContext::detect(&probe, &config.cross_settings(), &KnownTriples)
    .context("Failed to determine architecture profile")
}

/// Specifiers from the command line or the ports file.
pub fn collect_specifiers(ports: &PortArgs) -> Result<Vec<String>> {
  let Some(path) = ports.ports_file.as_deref() else {
    if ports.specifiers.is_empty() {
      bail!("You need to specify at least one port.");
    }
    return Ok(ports.specifiers.clone());
  };

  let content =
    fs::read_to_string(path).with_context(|| format!("Failed to read ports file {}", path.display()))?;
  let specifiers = parse_ports_file(&content);
  if specifiers.is_empty() {
    bail!("The ports file {} doesn't contain any ports.", path.display());
  }
  Ok(specifiers)
}

fn parse_ports_file(content: &str) -> Vec<String> {
  content
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .map(str::to_string)
    .collect()
}

/// Resolve and validate every specifier before anything is built.
pub fn resolve_all(session: &Session<'_>, specifiers: &[String], about: bool) -> Result<Vec<ResolvedPort>> {
  let mut ports = Vec::with_capacity(specifiers.len());

  for text in specifiers {
    let spec = PortSpecifier::parse(text)?;
    let mut port = session.resolve_specifier(&spec)?;
    session.validate(&mut port, spec.revision.as_deref())?;

    if about {
      print_description(&port);
    }
    ports.push(port);
  }

  Ok(ports)
}

fn print_description(port: &ResolvedPort) {
  print_info(&port.qualified_name());
  let description = port.description();
  if description.is_empty() {
    print_stat("Description", "(none)");
  }
  for text in description {
    for line in text.lines() {
      println!("  {}", line);
    }
  }
  println!();
}

pub fn build_options(stages: &StageArgs) -> BuildOptions {
  BuildOptions {
    clean: stages.clean,
    patch: !stages.no_patch,
    force: stages.force,
    quiet: stages.quiet,
    chroot: !stages.no_chroot,
    jobs: stages.jobs,
    ..Default::default()
  }
}
