//! Implementation of the `porter build` command.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use crate::output::{ProgressPrinter, format_duration, print_stat, print_success};
use crate::prompts::TerminalConfirmer;
use crate::{PortArgs, StageArgs};

use super::{PortTree, build_options, collect_specifiers, resolve_all};

/// Execute the build command.
///
/// Every specifier is resolved and validated first. Then each port is built
/// after the prerequisites it still needs, or on its own with
/// `no_dependencies`. The first failure stops the run.
pub fn cmd_build(
  config: Option<&Path>,
  ports: &PortArgs,
  stages: &StageArgs,
  no_package: bool,
  no_dependencies: bool,
) -> Result<()> {
  let start = Instant::now();
  let specifiers = collect_specifiers(ports)?;
  let tree = PortTree::open(config)?;

  let mut options = build_options(stages);
  options.package = !no_package;

  let confirmer = TerminalConfirmer;
  let session = tree
    .session(&confirmer, ports.yes)
    .with_options(options)
    .with_observer(&ProgressPrinter);

  let resolved = resolve_all(&session, &specifiers, ports.about)?;

  let mut built = Vec::new();
  let mut obsolete = Vec::new();
  for mut port in resolved {
    if no_dependencies {
      let packages = session.paths().packages().to_path_buf();
      session.build_single(&mut port, false, &packages)?;
      built.push(port.id());
    } else {
      let report = session.build_with_dependencies(&mut port)?;
      if report.obsolete {
        obsolete.push(port.id());
      }
      built.extend(report.built);
    }
  }

  println!();
  print_success("Build complete!");
  print_stat("Ports built", &built.len().to_string());
  if !obsolete.is_empty() {
    print_stat("Obsolete", &obsolete.join(", "));
  }
  print_stat("Packages", &session.paths().packages().display().to_string());
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}
