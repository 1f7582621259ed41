//! Implementation of the `porter fetch` command.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use crate::output::{ProgressPrinter, format_duration, print_stat, print_success};
use crate::prompts::TerminalConfirmer;
use crate::{PortArgs, StageArgs};

use super::{PortTree, build_options, collect_specifiers, resolve_all};

/// Download, unpack and (unless disabled) patch each port. Nothing is built.
pub fn cmd_fetch(config: Option<&Path>, ports: &PortArgs, stages: &StageArgs) -> Result<()> {
  let start = Instant::now();
  let specifiers = collect_specifiers(ports)?;
  let tree = PortTree::open(config)?;

  let mut options = build_options(stages);
  options.build = false;
  options.package = false;

  let confirmer = TerminalConfirmer;
  let session = tree
    .session(&confirmer, ports.yes)
    .with_options(options)
    .with_observer(&ProgressPrinter);

  let resolved = resolve_all(&session, &specifiers, ports.about)?;
  let packages = session.paths().packages().to_path_buf();

  for mut port in resolved {
    session.build_single(&mut port, false, &packages)?;
  }

  println!();
  print_success("Sources prepared");
  print_stat("Ports", &specifiers.len().to_string());
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}
