//! CLI output formatting utilities.
//!
//! Colored status messages, durations, Unicode symbols and the progress
//! banners printed while ports are built.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use porter_lib::build::{BuildObserver, RequiredPortSet};
use porter_lib::port::ResolvedPort;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 3600 {
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
  } else if secs >= 60 {
    format!("{}m {}s", secs / 60, secs % 60)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Prints a banner for every port the orchestrator starts.
pub struct ProgressPrinter;

impl BuildObserver for ProgressPrinter {
  fn port_started(&self, port: &ResolvedPort, with_dependencies: bool) {
    let banner = if with_dependencies {
      format!("Building {} with dependencies", port.qualified_name())
    } else {
      format!("{} {}", symbols::ARROW, port.qualified_name())
    };
    println!();
    println!("{}", banner.if_supports_color(Stream::Stdout, |s| s.bold()));
  }

  fn obsolete_port(&self, port: &ResolvedPort, target: &Path) {
    print_warning(&format!(
      "{} is obsolete, its packages go to {}",
      port.id(),
      target.display()
    ));
  }

  fn prerequisites(&self, required: &RequiredPortSet) {
    print_info("The following required ports will be built first:");
    for port in required.iter() {
      println!("  {}", port.qualified_name());
    }
  }
}
