//! Projection of dependency-solver output onto catalog ports.
//!
//! The solver resolves a port's build dependencies to package-info
//! artifacts. Artifacts outside the repository belong to packages that are
//! already available and need no build. Every artifact inside the repository
//! must map to exactly one catalog port; a package the catalog cannot place
//! means the solver and the catalog disagree, and the run stops.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{PortError, Result};
use crate::port::{BuildDependencyRef, ResolvedPort};

/// Ports that must be built before a given port, in first-discovery order.
#[derive(Debug, Clone, Default)]
pub struct RequiredPortSet {
  ports: Vec<ResolvedPort>,
  ids: HashSet<String>,
}

impl RequiredPortSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a port unless its id is already present. Returns whether it was added.
  pub fn insert(&mut self, port: ResolvedPort) -> bool {
    if !self.ids.insert(port.id()) {
      return false;
    }
    self.ports.push(port);
    true
  }

  pub fn contains(&self, port_id: &str) -> bool {
    self.ids.contains(port_id)
  }

  pub fn len(&self) -> usize {
    self.ports.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ports.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &ResolvedPort> {
    self.ports.iter()
  }

  /// Port ids in order.
  pub fn ids(&self) -> Vec<String> {
    self.ports.iter().map(ResolvedPort::id).collect()
  }
}

impl IntoIterator for RequiredPortSet {
  type Item = ResolvedPort;
  type IntoIter = std::vec::IntoIter<ResolvedPort>;

  fn into_iter(self) -> Self::IntoIter {
    self.ports.into_iter()
  }
}

/// Map the solver's artifacts for `port` to the catalog ports that must be built first.
///
/// `prefix` is the repository path the solver used; artifacts outside it are skipped.
pub fn project_required_ports(
  port: &ResolvedPort,
  dependencies: &[BuildDependencyRef],
  prefix: &Path,
  catalog: &dyn Catalog,
) -> Result<RequiredPortSet> {
  let mut required = RequiredPortSet::new();

  for dependency in dependencies {
    if !dependency.is_within(prefix) {
      debug!(path = ?dependency.path, "dependency already satisfied outside the repository");
      continue;
    }

    let inconsistency = |package: &str| PortError::DependencyInconsistency {
      port: port.id(),
      package: package.to_string(),
    };

    let package_id = dependency
      .package_id()
      .ok_or_else(|| inconsistency(&dependency.path.to_string_lossy()))?;

    let required_port = catalog
      .lookup(package_id)
      .or_else(|| {
        catalog
          .package_id_to_port_id(package_id)
          .and_then(|port_id| catalog.lookup(&port_id))
      })
      .ok_or_else(|| inconsistency(package_id))?;

    let required_id = required_port.id();
    if required.insert(required_port) {
      debug!(package = %package_id, port = %required_id, "required port");
    }
  }

  Ok(required)
}
