//! The single-port build pipeline and building with prerequisites.
//!
//! Pipeline stages run strictly in order, one port at a time:
//! recipe parse (optional), clean (optional), download, unpack,
//! patch (optional), build + package (optional). The first failing stage
//! stops the whole run; nothing is retried or skipped.

use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::backend::{BackendError, BuildEnv, PortBackend};
use crate::catalog::Catalog;
use crate::error::{PortError, Result};
use crate::platform::ArchitectureContext;
use crate::port::ResolvedPort;

use super::deps::{RequiredPortSet, project_required_ports};
use super::types::{BuildOptions, BuildReport, OutputPaths, Stage};

/// Receives progress notifications while ports are built.
pub trait BuildObserver {
  /// A port's pipeline (or, with `with_dependencies`, its whole closure) starts.
  fn port_started(&self, _port: &ResolvedPort, _with_dependencies: bool) {}

  /// The top-level port is not in the catalog; its packages go to `target`.
  fn obsolete_port(&self, _port: &ResolvedPort, _target: &Path) {}

  /// Prerequisites that will be built before the top-level port.
  fn prerequisites(&self, _required: &RequiredPortSet) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl BuildObserver for SilentObserver {}

/// Drives ports through the build pipeline.
pub struct BuildOrchestrator<'a> {
  catalog: &'a dyn Catalog,
  backend: &'a dyn PortBackend,
  observer: &'a dyn BuildObserver,
  options: BuildOptions,
  paths: OutputPaths,
  env: BuildEnv,
}

impl<'a> BuildOrchestrator<'a> {
  pub fn new(
    catalog: &'a dyn Catalog,
    backend: &'a dyn PortBackend,
    context: &ArchitectureContext,
    options: BuildOptions,
    paths: OutputPaths,
  ) -> Self {
    let options = options.normalized();
    let env = BuildEnv {
      variables: context.shell_variables(options.jobs, options.quiet),
      force: options.force,
      quiet: options.quiet,
      chroot: options.chroot,
    };

    Self {
      catalog,
      backend,
      observer: &SilentObserver,
      options,
      paths,
      env,
    }
  }

  pub fn with_observer(mut self, observer: &'a dyn BuildObserver) -> Self {
    self.observer = observer;
    self
  }

  pub fn options(&self) -> &BuildOptions {
    &self.options
  }

  pub fn paths(&self) -> &OutputPaths {
    &self.paths
  }

  pub fn env(&self) -> &BuildEnv {
    &self.env
  }

  /// Build `port` after every prerequisite it still needs.
  ///
  /// Prerequisites are projected from the dependency solver's output and
  /// each runs the full pipeline, recipe parse included, into the shared
  /// packages directory. The top-level port goes last; if the catalog no
  /// longer has its package-info artifact, its packages are written to the
  /// obsolete directory instead.
  pub fn build_with_dependencies(&self, port: &mut ResolvedPort) -> Result<BuildReport> {
    let port_id = port.id();
    info!(port = %port_id, "building port with dependencies");
    self.observer.port_started(port, true);

    let obsolete = !self.catalog.has_package_info(port);
    let target_path = if obsolete {
      let obsolete_path = self.paths.ensure_obsolete()?;
      warn!(port = %port_id, path = ?obsolete_path, "building obsolete package");
      self.observer.obsolete_port(port, &obsolete_path);
      obsolete_path
    } else {
      self.paths.packages().to_path_buf()
    };

    let (dependencies, prefix) = self.stage(&port_id, Stage::ResolveDependencies, || {
      self.backend.resolve_build_dependencies(
        port,
        self.catalog.repository_path(),
        self.paths.packages(),
        &self.env,
      )
    })?;

    let required = project_required_ports(port, &dependencies, &prefix, self.catalog)?;
    let mut built = Vec::with_capacity(required.len() + 1);

    if !required.is_empty() {
      info!(port = %port_id, required = ?required.ids(), "required ports will be built first");
      self.observer.prerequisites(&required);
    }

    for mut prerequisite in required {
      self.build_single(&mut prerequisite, true, self.paths.packages())?;
      built.push(prerequisite.id());
    }

    let parse_recipe = !port.is_recipe_parsed();
    self.build_single(port, parse_recipe, &target_path)?;
    built.push(port_id);

    Ok(BuildReport {
      built,
      target_path,
      obsolete,
    })
  }

  /// Run the pipeline for one port, without resolving its dependencies.
  pub fn build_single(&self, port: &mut ResolvedPort, parse_recipe: bool, target_path: &Path) -> Result<()> {
    let port_id = port.id();
    let pipeline = self.options.pipeline(parse_recipe);
    info!(port = %port_id, stages = ?pipeline.stages(), "building port");
    self.observer.port_started(port, false);

    if pipeline.parse_recipe {
      self.parse_recipe(port)?;
    }

    if pipeline.clean {
      self.stage(&port_id, Stage::Clean, || self.backend.clean_work_directory(port, &self.env))?;
    }

    self.stage(&port_id, Stage::Download, || self.backend.download_source(port, &self.env))?;
    self.stage(&port_id, Stage::Unpack, || self.backend.unpack_source(port, &self.env))?;

    if pipeline.patch {
      self.stage(&port_id, Stage::Patch, || self.backend.patch_source(port, &self.env))?;
    }

    if pipeline.build {
      self.stage(&port_id, Stage::Build, || {
        self
          .backend
          .build(port, &self.env, self.paths.packages(), pipeline.package, target_path)
      })?;
    }

    info!(port = %port_id, "port done");
    Ok(())
  }

  /// Parse the port's recipe and fill in its revision, status and keys.
  pub fn parse_recipe(&self, port: &mut ResolvedPort) -> Result<()> {
    let port_id = port.id();
    let recipe = self.stage(&port_id, Stage::ParseRecipe, || self.backend.parse_recipe(port, &self.env))?;
    port.apply_recipe(recipe);
    Ok(())
  }

  fn stage<T>(&self, port_id: &str, stage: Stage, run: impl FnOnce() -> Result<T, BackendError>) -> Result<T> {
    debug!(port = %port_id, stage = %stage, "running stage");
    run().map_err(|e| {
      error!(port = %port_id, stage = %stage, error = %e, "stage failed");
      PortError::stage(port_id, stage, e)
    })
  }
}
