//! Error types for porter-lib
//!
//! Every variant is fatal to the whole run. Nothing here is retried or
//! skipped; the CLI boundary turns any of them into a non-zero exit.

use std::path::PathBuf;

use thiserror::Error;

use crate::backend::BackendError;
use crate::build::Stage;
use crate::catalog::json::CatalogError;
use crate::config::ConfigError;
use crate::port::Status;

/// Convenience alias used throughout the crate.
pub type Result<T, E = PortError> = std::result::Result<T, E>;

/// Errors that abort a porter run.
#[derive(Debug, Error)]
pub enum PortError {
  /// The specifier did not split into 1 to 3 hyphen-separated elements.
  #[error("invalid port specifier {specifier}")]
  MalformedSpecifier { specifier: String },

  /// Neither the name nor the composed id is known to the catalog.
  #[error("{specifier} not found in tree")]
  PortNotFound { specifier: String },

  /// The parsed recipe carries another revision than the one requested.
  #[error("port {port} isn't available in revision {expected} (found revision {found} instead)")]
  RevisionMismatch {
    port: String,
    expected: String,
    found: String,
  },

  /// The port is not stable on this architecture and the user declined.
  #[error("port {port} is {status} on this architecture, build declined")]
  UnsupportedStatusDeclined { port: String, status: Status },

  /// The recipe's informational message was shown and the user declined.
  #[error("message of port {port} was declined")]
  MessageDeclined { port: String },

  /// The dependency solver names a package the catalog cannot map to a port.
  #[error("inconsistency: {port} requires {package} but no corresponding port was found")]
  DependencyInconsistency { port: String, package: String },

  /// A pipeline stage of a port failed.
  #[error("{stage} failed for {port}: {source}")]
  StageFailure {
    port: String,
    stage: Stage,
    #[source]
    source: BackendError,
  },

  /// The host package system could not be probed or its architecture is unknown.
  #[error("failed to determine architecture profile: {reason}")]
  ArchitectureProbeFailure { reason: String },

  /// The catalog index could not be read.
  #[error(transparent)]
  Catalog(#[from] CatalogError),

  /// Configuration could not be loaded or is invalid.
  #[error(transparent)]
  Config(#[from] ConfigError),

  /// An output directory could not be created.
  #[error("failed to create {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl PortError {
  pub(crate) fn stage(port: &str, stage: Stage, source: BackendError) -> Self {
    Self::StageFailure {
      port: port.to_string(),
      stage,
      source,
    }
  }

  pub(crate) fn probe(reason: impl Into<String>) -> Self {
    Self::ArchitectureProbeFailure { reason: reason.into() }
  }
}
