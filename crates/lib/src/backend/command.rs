//! Collaborator adapter that delegates to an external executable.
//!
//! Every operation runs `<backend> <operation> <port-id>` with the build
//! variables and a handful of `PORTER_*` settings in the environment:
//! - `parse-recipe` prints a JSON [`RecipeInfo`] on stdout
//! - `resolve-build-dependencies` prints `{"dependencies": [..], "repository": ".."}`
//! - `clean`, `download`, `unpack`, `patch` and `build` report through their exit code
//!
//! Stage output of the side-effecting operations goes straight to the
//! terminal; the two query operations are captured.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;
use tracing::{debug, info};

use crate::port::{BuildDependencyRef, RecipeInfo, ResolvedPort};

use super::{BackendError, BuildEnv, BuildMechanics, DependencySolver, RecipeParser};

/// Output of the `resolve-build-dependencies` operation.
#[derive(Debug, Deserialize)]
struct ResolvedDependencies {
  #[serde(default)]
  dependencies: Vec<BuildDependencyRef>,
  repository: PathBuf,
}

/// Runs the configured backend executable for each collaborator call.
#[derive(Debug, Clone)]
pub struct CommandBackend {
  program: PathBuf,
}

impl CommandBackend {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
    }
  }

  pub fn program(&self) -> &Path {
    &self.program
  }

  fn command(&self, operation: &str, port: &ResolvedPort, env: &BuildEnv) -> Command {
    let mut command = Command::new(&self.program);
    command
      .arg(operation)
      .arg(port.id())
      .envs(&env.variables)
      .env("PORTER_PORT_NAME", &port.name)
      .env("PORTER_PORT_VERSION", &port.version)
      .env("PORTER_PORT_CATEGORY", &port.category)
      .env("PORTER_FORCE", flag(env.force))
      .env("PORTER_QUIET", flag(env.quiet))
      .env("PORTER_CHROOT", flag(env.chroot));
    command
  }

  fn describe(&self, operation: &str, port: &ResolvedPort) -> String {
    format!("{} {} {}", self.program.display(), operation, port.id())
  }

  /// Run an operation whose stdout is the result.
  fn query(&self, mut command: Command, cmd: &str) -> Result<String, BackendError> {
    debug!(cmd = %cmd, "querying backend");

    let output = command
      .stdin(Stdio::null())
      .stderr(Stdio::inherit())
      .output()
      .map_err(|source| BackendError::Spawn {
        cmd: cmd.to_string(),
        source,
      })?;

    if !output.status.success() {
      return Err(BackendError::CmdFailed {
        cmd: cmd.to_string(),
        code: output.status.code(),
      });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  }

  /// Run a side-effecting operation, streaming its output.
  fn run(&self, mut command: Command, cmd: &str) -> Result<(), BackendError> {
    info!(cmd = %cmd, "running backend stage");

    let status = command.status().map_err(|source| BackendError::Spawn {
      cmd: cmd.to_string(),
      source,
    })?;

    if !status.success() {
      return Err(BackendError::CmdFailed {
        cmd: cmd.to_string(),
        code: status.code(),
      });
    }

    Ok(())
  }

  fn stage(&self, operation: &str, port: &ResolvedPort, env: &BuildEnv) -> Result<(), BackendError> {
    let cmd = self.describe(operation, port);
    self.run(self.command(operation, port, env), &cmd)
  }
}

fn flag(value: bool) -> &'static str {
  if value { "1" } else { "0" }
}

impl RecipeParser for CommandBackend {
  fn parse_recipe(&self, port: &ResolvedPort, env: &BuildEnv) -> Result<RecipeInfo, BackendError> {
    let cmd = self.describe("parse-recipe", port);
    let stdout = self.query(self.command("parse-recipe", port, env), &cmd)?;
    serde_json::from_str(&stdout).map_err(|e| BackendError::InvalidOutput {
      cmd,
      message: e.to_string(),
    })
  }
}

impl DependencySolver for CommandBackend {
  fn resolve_build_dependencies(
    &self,
    port: &ResolvedPort,
    repository_path: &Path,
    packages_path: &Path,
    env: &BuildEnv,
  ) -> Result<(Vec<BuildDependencyRef>, PathBuf), BackendError> {
    let cmd = self.describe("resolve-build-dependencies", port);
    let mut command = self.command("resolve-build-dependencies", port, env);
    command
      .env("PORTER_REPOSITORY", repository_path)
      .env("PORTER_PACKAGES", packages_path);

    let stdout = self.query(command, &cmd)?;
    let resolved: ResolvedDependencies = serde_json::from_str(&stdout).map_err(|e| BackendError::InvalidOutput {
      cmd,
      message: e.to_string(),
    })?;

    Ok((resolved.dependencies, resolved.repository))
  }
}

impl BuildMechanics for CommandBackend {
  fn clean_work_directory(&self, port: &ResolvedPort, env: &BuildEnv) -> Result<(), BackendError> {
    self.stage("clean", port, env)
  }

  fn download_source(&self, port: &ResolvedPort, env: &BuildEnv) -> Result<(), BackendError> {
    self.stage("download", port, env)
  }

  fn unpack_source(&self, port: &ResolvedPort, env: &BuildEnv) -> Result<(), BackendError> {
    self.stage("unpack", port, env)
  }

  fn patch_source(&self, port: &ResolvedPort, env: &BuildEnv) -> Result<(), BackendError> {
    self.stage("patch", port, env)
  }

  fn build(
    &self,
    port: &ResolvedPort,
    env: &BuildEnv,
    packages_path: &Path,
    make_packages: bool,
    target_path: &Path,
  ) -> Result<(), BackendError> {
    let cmd = self.describe("build", port);
    let mut command = self.command("build", port, env);
    command
      .env("PORTER_PACKAGES", packages_path)
      .env("PORTER_PACKAGE", flag(make_packages))
      .env("PORTER_TARGET", target_path);
    self.run(command, &cmd)
  }
}
