//! The port catalog.
//!
//! The catalog is the external index of all known ports and the packages
//! they produce for the active tree. [`Catalog`] is the narrow view the
//! build core needs; [`json::JsonCatalog`] reads an index written by the
//! external indexer.

pub mod json;

use std::path::Path;

use crate::port::ResolvedPort;

pub use json::{CatalogError, JsonCatalog};

/// Read-only access to the ports and packages of the active repository.
pub trait Catalog {
  /// Directory holding the package-info artifacts.
  fn repository_path(&self) -> &Path;

  /// Look up a port by id (`name-version`).
  fn lookup(&self, port_id: &str) -> Option<ResolvedPort>;

  /// Known versions of a port name in ascending order, `None` for an unknown name.
  fn versions_by_name(&self, name: &str) -> Option<Vec<String>>;

  /// Map a secondary package id to the id of the port producing it.
  fn package_id_to_port_id(&self, package_id: &str) -> Option<String>;

  /// Whether the repository still holds the port's package-info artifact.
  fn has_package_info(&self, port: &ResolvedPort) -> bool {
    self.repository_path().join(port.package_info_name()).exists()
  }

  /// Whether the catalog knows the port id.
  fn contains(&self, port_id: &str) -> bool {
    self.lookup(port_id).is_some()
  }
}
