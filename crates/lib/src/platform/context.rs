//! Build/target architecture profile.
//!
//! Computed once at startup from the host probe and the configuration, then
//! passed by reference into everything that builds.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::consts::CROSS_SYSROOT_ROOT;
use crate::error::{PortError, Result};

use super::arch::{TripleLookup, triple_as_name};
use super::probe::{SystemProbe, parse_package_listing};

/// Repository settings that shape the architecture profile.
#[derive(Debug, Clone, Default)]
pub struct CrossSettings {
  /// Whether the active repository is a cross-build repository.
  pub is_cross_repository: bool,
  /// Configured target architecture (only consulted for cross-build repositories).
  pub target_architecture: Option<String>,
}

/// Immutable build/target architecture identifiers for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchitectureContext {
  pub haiku_version: String,
  pub build_architecture: String,
  pub target_architecture: String,
  pub build_triple: String,
  pub target_triple: String,
  pub is_cross: bool,
}

impl ArchitectureContext {
  /// Probe the host once and derive the profile.
  pub fn detect(probe: &dyn SystemProbe, settings: &CrossSettings, triples: &dyn TripleLookup) -> Result<Self> {
    let listing = probe
      .package_listing()
      .map_err(|e| PortError::probe(format!("system package probe failed: {}", e)))?;
    let host = parse_package_listing(&listing)?;
    debug!(version = %host.version, architecture = %host.architecture, "probed host package system");

    Self::derive(host.version, host.architecture, settings, triples)
  }

  /// Derive the profile from already-known host values.
  ///
  /// For a cross-build repository with identical build and target
  /// architectures, the build triple comes from
  /// [`TripleLookup::build_triple`] so that it differs from the target triple.
  pub fn derive(
    haiku_version: String,
    build_architecture: String,
    settings: &CrossSettings,
    triples: &dyn TripleLookup,
  ) -> Result<Self> {
    let native = |arch: &str| {
      triples
        .native_triple(arch)
        .ok_or_else(|| PortError::probe(format!("no machine triple known for architecture '{}'", arch)))
    };

    if !settings.is_cross_repository {
      let triple = triples.native_triple(&build_architecture).unwrap_or_else(|| {
        debug!(architecture = %build_architecture, "no known machine triple, using a generic one");
        generic_triple(&build_architecture)
      });
      return Ok(Self {
        haiku_version,
        target_architecture: build_architecture.clone(),
        build_architecture,
        build_triple: triple.clone(),
        target_triple: triple,
        is_cross: false,
      });
    }

    let target_architecture = settings
      .target_architecture
      .as_deref()
      .map(str::to_lowercase)
      .ok_or_else(|| PortError::probe("cross-build repository without a target architecture"))?;

    let target_triple = native(&target_architecture)?;
    let build_triple = if build_architecture == target_architecture {
      triples.build_triple(&build_architecture).ok_or_else(|| {
        PortError::probe(format!(
          "no build triple known for architecture '{}'",
          build_architecture
        ))
      })?
    } else {
      native(&build_architecture)?
    };

    if build_architecture == target_architecture && build_triple == target_triple {
      return Err(PortError::probe(format!(
        "build triple '{}' must differ from target triple for a same-architecture cross build",
        build_triple
      )));
    }

    info!(
      build = %build_triple,
      target = %target_triple,
      "cross-build repository"
    );

    Ok(Self {
      haiku_version,
      build_architecture,
      target_architecture,
      build_triple,
      target_triple,
      is_cross: true,
    })
  }

  /// Build triple with hyphens replaced by underscores.
  pub fn build_triple_as_name(&self) -> String {
    triple_as_name(&self.build_triple)
  }

  /// Target triple with hyphens replaced by underscores.
  pub fn target_triple_as_name(&self) -> String {
    triple_as_name(&self.target_triple)
  }

  /// Sysroot holding the target's headers and libraries, only for cross builds.
  pub fn cross_sysroot(&self) -> Option<PathBuf> {
    self
      .is_cross
      .then(|| PathBuf::from(CROSS_SYSROOT_ROOT).join(&self.target_architecture))
  }

  /// Variables exported to every build stage.
  pub fn shell_variables(&self, jobs: usize, quiet: bool) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    vars.insert("haikuVersion".to_string(), self.haiku_version.clone());
    vars.insert("buildArchitecture".to_string(), self.build_architecture.clone());
    vars.insert("targetArchitecture".to_string(), self.target_architecture.clone());
    vars.insert("jobs".to_string(), jobs.to_string());
    if jobs > 1 {
      vars.insert("jobArgs".to_string(), format!("-j{}", jobs));
    }
    if quiet {
      vars.insert("quiet".to_string(), "1".to_string());
    }
    vars.insert("isCrossRepository".to_string(), self.is_cross.to_string());

    if let Some(sysroot) = self.cross_sysroot() {
      vars.insert("buildMachineTriple".to_string(), self.build_triple.clone());
      vars.insert("buildMachineTripleAsName".to_string(), self.build_triple_as_name());
      vars.insert("targetMachineTriple".to_string(), self.target_triple.clone());
      vars.insert("targetMachineTripleAsName".to_string(), self.target_triple_as_name());
      vars.insert("crossSysrootDir".to_string(), sysroot.to_string_lossy().into_owned());
    }

    vars
  }
}

/// `<arch>-unknown-haiku`, for native runs on an architecture the table lacks.
fn generic_triple(architecture: &str) -> String {
  format!("{}-unknown-haiku", architecture)
}
