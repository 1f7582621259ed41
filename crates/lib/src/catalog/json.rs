//! Catalog read from the JSON index written by the external indexer.
//!
//! ```json
//! {
//!   "ports": [{"name": "foo", "version": "1.0", "category": "app-misc", "revision": "2"}],
//!   "packages": {"foo_devel-1.0": "foo-1.0"}
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::port::ResolvedPort;
use crate::util::version::sort_versions;

use super::Catalog;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("failed to read catalog index {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse catalog index {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

#[derive(Debug, Deserialize)]
struct CatalogIndex {
  #[serde(default)]
  ports: Vec<PortEntry>,
  #[serde(default)]
  packages: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct PortEntry {
  name: String,
  version: String,
  category: String,
  #[serde(default)]
  revision: Option<String>,
}

/// In-memory catalog built from a JSON index.
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
  repository: PathBuf,
  ports: BTreeMap<String, ResolvedPort>,
  versions: BTreeMap<String, Vec<String>>,
  packages: BTreeMap<String, String>,
}

impl JsonCatalog {
  /// Read the index at `index_path` for the repository at `repository_path`.
  pub fn load(repository_path: &Path, index_path: &Path) -> Result<Self, CatalogError> {
    let content = fs::read_to_string(index_path).map_err(|source| CatalogError::Read {
      path: index_path.to_path_buf(),
      source,
    })?;

    Self::from_json(repository_path, &content).map_err(|source| CatalogError::Parse {
      path: index_path.to_path_buf(),
      source,
    })
  }

  pub fn from_json(repository_path: &Path, content: &str) -> Result<Self, serde_json::Error> {
    let index: CatalogIndex = serde_json::from_str(content)?;
    let mut catalog = Self {
      repository: repository_path.to_path_buf(),
      packages: index.packages,
      ..Default::default()
    };

    for entry in index.ports {
      let mut port = ResolvedPort::new(entry.name, entry.version, entry.category);
      port.revision = entry.revision;

      let versions = catalog.versions.entry(port.name.clone()).or_default();
      if !versions.contains(&port.version) {
        versions.push(port.version.clone());
      }
      catalog.ports.insert(port.id(), port);
    }

    for versions in catalog.versions.values_mut() {
      sort_versions(versions);
    }

    debug!(
      ports = catalog.ports.len(),
      packages = catalog.packages.len(),
      "catalog loaded"
    );
    Ok(catalog)
  }

  pub fn len(&self) -> usize {
    self.ports.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ports.is_empty()
  }

  /// All ports ordered by id.
  pub fn ports(&self) -> impl Iterator<Item = &ResolvedPort> {
    self.ports.values()
  }
}

impl Catalog for JsonCatalog {
  fn repository_path(&self) -> &Path {
    &self.repository
  }

  fn lookup(&self, port_id: &str) -> Option<ResolvedPort> {
    self.ports.get(port_id).cloned()
  }

  fn versions_by_name(&self, name: &str) -> Option<Vec<String>> {
    self.versions.get(name).cloned()
  }

  fn package_id_to_port_id(&self, package_id: &str) -> Option<String> {
    self.packages.get(package_id).cloned()
  }
}
