use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{PortError, Result};
use crate::platform::ArchitectureContext;

use super::ResolvedPort;

/// A `name[-version[-revision]]` token as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpecifier {
  pub text: String,
  pub name: String,
  pub version: Option<String>,
  pub revision: Option<String>,
}

impl PortSpecifier {
  /// Split the token on `-` into one to three elements.
  pub fn parse(text: &str) -> Result<Self> {
    let elements: Vec<&str> = text.split('-').collect();
    if elements.len() > 3 {
      return Err(PortError::MalformedSpecifier {
        specifier: text.to_string(),
      });
    }

    let mut elements = elements.into_iter().map(str::to_string);
    Ok(Self {
      text: text.to_string(),
      name: elements.next().unwrap_or_default(),
      version: elements.next(),
      // `foo-1.0-` names no revision
      revision: elements.next().filter(|r| !r.is_empty()),
    })
  }
}

impl FromStr for PortSpecifier {
  type Err = PortError;

  fn from_str(s: &str) -> Result<Self> {
    Self::parse(s)
  }
}

impl fmt::Display for PortSpecifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.text)
  }
}

/// Resolve a specifier to a catalog port.
///
/// Without a version, the last (newest) entry of the name's version list is
/// used. In a cross-build repository an unknown name is retried as
/// `name_<targetArchitecture>`. The revision is not checked here; it is only
/// known once the recipe has been parsed.
pub fn resolve_specifier(
  spec: &PortSpecifier,
  catalog: &dyn Catalog,
  context: &ArchitectureContext,
) -> Result<ResolvedPort> {
  let not_found = || PortError::PortNotFound {
    specifier: spec.text.clone(),
  };

  let (name, version) = match &spec.version {
    Some(version) => (spec.name.clone(), version.clone()),
    None => {
      let (name, versions) = match catalog.versions_by_name(&spec.name) {
        Some(versions) => (spec.name.clone(), versions),
        None if context.is_cross => {
          let name_with_arch = format!("{}_{}", spec.name, context.target_architecture);
          debug!(name = %name_with_arch, "retrying with target architecture suffix");
          let versions = catalog.versions_by_name(&name_with_arch).ok_or_else(not_found)?;
          (name_with_arch, versions)
        }
        None => return Err(not_found()),
      };
      let latest = versions.last().cloned().ok_or_else(not_found)?;
      (name, latest)
    }
  };

  let port_id = format!("{}-{}", name, version);
  catalog.lookup(&port_id).ok_or(PortError::PortNotFound { specifier: port_id })
}
