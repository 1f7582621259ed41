//! Host package-system probe.
//!
//! The host's system package declares the OS version and architecture in an
//! unstructured `key: value` listing. The probe fetches that listing once and
//! [`parse_package_listing`] extracts the two values.

use std::path::PathBuf;
use std::process::Command;

use regex::Regex;
use tracing::debug;

use crate::backend::BackendError;
use crate::error::{PortError, Result};

const KEY_VALUE_LINE: &str = r"^\s*[[:alpha:]]+:\s+";
const HAIKU_VERSION: &str = r"provides:\s*haiku\s+=\s*(\S+)";
const ARCHITECTURE: &str = r"architecture:\s*(\S+)";

/// Source of the host package system's raw package listing.
pub trait SystemProbe {
  fn package_listing(&self) -> Result<String, BackendError>;
}

/// Runs `package list <system package>` and returns its stdout.
#[derive(Debug, Clone)]
pub struct PackageCommandProbe {
  pub system_package: PathBuf,
}

impl PackageCommandProbe {
  pub fn new(system_package: impl Into<PathBuf>) -> Self {
    Self {
      system_package: system_package.into(),
    }
  }
}

impl SystemProbe for PackageCommandProbe {
  fn package_listing(&self) -> Result<String, BackendError> {
    let cmd = format!("package list {}", self.system_package.display());
    debug!(cmd = %cmd, "probing system package");

    let output = Command::new("package")
      .arg("list")
      .arg(&self.system_package)
      .output()
      .map_err(|source| BackendError::Spawn {
        cmd: cmd.clone(),
        source,
      })?;

    if !output.status.success() {
      return Err(BackendError::CmdFailed {
        cmd,
        code: output.status.code(),
      });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  }
}

/// Host values extracted from the package listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPackageInfo {
  pub version: String,
  pub architecture: String,
}

/// Extract the host version and architecture from a package listing.
///
/// Only lines shaped like `key: value` are considered. Missing either value
/// is an [`PortError::ArchitectureProbeFailure`].
pub fn parse_package_listing(listing: &str) -> Result<HostPackageInfo> {
  let key_value_line = compile(KEY_VALUE_LINE)?;
  let attributes: String = listing
    .lines()
    .filter(|line| key_value_line.is_match(line))
    .collect::<Vec<_>>()
    .join("\n");

  let version = compile(HAIKU_VERSION)?
    .captures(&attributes)
    .map(|c| c[1].to_string())
    .ok_or_else(|| PortError::probe("failed to get Haiku version"))?;

  let architecture = compile(ARCHITECTURE)?
    .captures(&attributes)
    .map(|c| c[1].to_string())
    .ok_or_else(|| PortError::probe("failed to get Haiku architecture"))?;

  Ok(HostPackageInfo { version, architecture })
}

fn compile(pattern: &str) -> Result<Regex> {
  Regex::new(pattern).map_err(|e| PortError::probe(format!("invalid probe pattern: {}", e)))
}
