//! Per-port collaborators: recipe subsystem, dependency solver and build mechanics.
//!
//! The build core only sees these traits. [`command::CommandBackend`]
//! implements all three by delegating to an external executable.

pub mod command;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::port::{BuildDependencyRef, RecipeInfo, ResolvedPort};

pub use command::CommandBackend;

/// Errors reported by a collaborator.
#[derive(Debug, Error)]
pub enum BackendError {
  /// The collaborator process could not be started.
  #[error("failed to run {cmd}: {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  /// The collaborator exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {cmd}")]
  CmdFailed { cmd: String, code: Option<i32> },

  /// The collaborator's output could not be understood.
  #[error("invalid output from {cmd}: {message}")]
  InvalidOutput { cmd: String, message: String },
}

/// Settings every stage of every port receives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnv {
  /// Variables derived from the architecture profile.
  pub variables: BTreeMap<String, String>,
  /// Rebuild even when the stage considers its output current.
  pub force: bool,
  /// Reduce stage output.
  pub quiet: bool,
  /// Build inside a chroot.
  pub chroot: bool,
}

/// Recipe subsystem. Parsing is idempotent.
pub trait RecipeParser {
  fn parse_recipe(&self, port: &ResolvedPort, env: &BuildEnv) -> Result<RecipeInfo, BackendError>;
}

/// Dependency solver.
pub trait DependencySolver {
  /// Resolve the port's build dependencies to package-info artifacts.
  ///
  /// Returns the artifacts and the repository prefix the resolution used.
  fn resolve_build_dependencies(
    &self,
    port: &ResolvedPort,
    repository_path: &Path,
    packages_path: &Path,
    env: &BuildEnv,
  ) -> Result<(Vec<BuildDependencyRef>, PathBuf), BackendError>;
}

/// Source retrieval and compilation steps of a single port.
pub trait BuildMechanics {
  fn clean_work_directory(&self, port: &ResolvedPort, env: &BuildEnv) -> Result<(), BackendError>;

  fn download_source(&self, port: &ResolvedPort, env: &BuildEnv) -> Result<(), BackendError>;

  fn unpack_source(&self, port: &ResolvedPort, env: &BuildEnv) -> Result<(), BackendError>;

  fn patch_source(&self, port: &ResolvedPort, env: &BuildEnv) -> Result<(), BackendError>;

  fn build(
    &self,
    port: &ResolvedPort,
    env: &BuildEnv,
    packages_path: &Path,
    make_packages: bool,
    target_path: &Path,
  ) -> Result<(), BackendError>;
}

/// Everything the orchestrator needs from the per-port collaborators.
pub trait PortBackend: RecipeParser + DependencySolver + BuildMechanics {}

impl<T: RecipeParser + DependencySolver + BuildMechanics> PortBackend for T {}
