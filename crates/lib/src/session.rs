//! The surface the CLI drives: resolve, validate and build ports.
//!
//! A [`Session`] ties the collaborators to the architecture context that
//! was computed once at startup. It holds no state of its own between calls.

use std::path::Path;

use tracing::debug;

use crate::backend::{BuildEnv, PortBackend};
use crate::build::{BuildObserver, BuildOptions, BuildOrchestrator, BuildReport, OutputPaths, SilentObserver};
use crate::catalog::Catalog;
use crate::error::Result;
use crate::gate::{BuildGate, Confirmer, GatePolicy};
use crate::platform::ArchitectureContext;
use crate::port::{PortSpecifier, ResolvedPort, resolve_specifier};

pub struct Session<'a> {
  catalog: &'a dyn Catalog,
  backend: &'a dyn PortBackend,
  confirmer: &'a dyn Confirmer,
  observer: &'a dyn BuildObserver,
  context: ArchitectureContext,
  paths: OutputPaths,
  options: BuildOptions,
  policy: GatePolicy,
}

impl<'a> Session<'a> {
  pub fn new(
    catalog: &'a dyn Catalog,
    backend: &'a dyn PortBackend,
    confirmer: &'a dyn Confirmer,
    context: ArchitectureContext,
    paths: OutputPaths,
  ) -> Self {
    Self {
      catalog,
      backend,
      confirmer,
      observer: &SilentObserver,
      context,
      paths,
      options: BuildOptions::default(),
      policy: GatePolicy::default(),
    }
  }

  pub fn with_options(mut self, options: BuildOptions) -> Self {
    self.options = options.normalized();
    self
  }

  pub fn with_policy(mut self, policy: GatePolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn with_observer(mut self, observer: &'a dyn BuildObserver) -> Self {
    self.observer = observer;
    self
  }

  pub fn context(&self) -> &ArchitectureContext {
    &self.context
  }

  pub fn paths(&self) -> &OutputPaths {
    &self.paths
  }

  pub fn options(&self) -> &BuildOptions {
    &self.options
  }

  /// Environment handed to every stage.
  pub fn build_env(&self) -> BuildEnv {
    self.orchestrator().env().clone()
  }

  /// Parse `text` and resolve it against the catalog.
  pub fn resolve(&self, text: &str) -> Result<ResolvedPort> {
    let spec = PortSpecifier::parse(text)?;
    self.resolve_specifier(&spec)
  }

  pub fn resolve_specifier(&self, spec: &PortSpecifier) -> Result<ResolvedPort> {
    let port = resolve_specifier(spec, self.catalog, &self.context)?;
    debug!(specifier = %spec, port = %port.id(), "resolved");
    Ok(port)
  }

  /// Parse the recipe unless that already happened, then run the gates.
  pub fn validate(&self, port: &mut ResolvedPort, expected_revision: Option<&str>) -> Result<()> {
    if !port.is_recipe_parsed() {
      self.orchestrator().parse_recipe(port)?;
    }
    BuildGate::new(self.policy, self.confirmer).check(port, expected_revision)
  }

  pub fn build_with_dependencies(&self, port: &mut ResolvedPort) -> Result<BuildReport> {
    self.paths.ensure_packages()?;
    self.orchestrator().build_with_dependencies(port)
  }

  pub fn build_single(&self, port: &mut ResolvedPort, parse_recipe: bool, target_path: &Path) -> Result<()> {
    self.paths.ensure_packages()?;
    self.orchestrator().build_single(port, parse_recipe, target_path)
  }

  fn orchestrator(&self) -> BuildOrchestrator<'a> {
    BuildOrchestrator::new(
      self.catalog,
      self.backend,
      &self.context,
      self.options.clone(),
      self.paths.clone(),
    )
    .with_observer(self.observer)
  }
}
