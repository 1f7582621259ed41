use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use porter_lib::config::Config;
use porter_lib::platform::ArchitectureContext;

use crate::output::{OutputFormat, print_info, print_json, print_stat};

use super::detect_context;

#[derive(Serialize)]
struct Info<'a> {
  tree: &'a Path,
  packages: &'a Path,
  backend: &'a Path,
  context: &'a ArchitectureContext,
  variables: BTreeMap<String, String>,
}

/// Print the architecture profile of this host and the variables every stage receives.
pub fn cmd_info(config: Option<&Path>, output: OutputFormat) -> Result<()> {
  let config = Config::load(config).context("Failed to load configuration")?;
  let context = detect_context(&config)?;
  let paths = config.output_paths();

  let info = Info {
    tree: &config.tree_path,
    packages: paths.packages(),
    backend: &config.backend,
    context: &context,
    variables: context.shell_variables(1, false),
  };

  if output.is_json() {
    return print_json(&info);
  }

  print_info(&format!("porter v{}", env!("CARGO_PKG_VERSION")));
  print_stat("Tree", &info.tree.display().to_string());
  print_stat("Packages", &info.packages.display().to_string());
  print_stat("Backend", &info.backend.display().to_string());
  print_stat("Haiku version", &context.haiku_version);
  print_stat("Build architecture", &context.build_architecture);
  print_stat("Target architecture", &context.target_architecture);
  print_stat("Build triple", &context.build_triple);
  print_stat("Target triple", &context.target_triple);
  print_stat("Cross build", &context.is_cross.to_string());

  println!();
  print_info("Build variables:");
  for (name, value) in &info.variables {
    print_stat(name, value);
  }

  Ok(())
}
