//! Configuration loaded from `porter.toml`.
//!
//! Lookup order: an explicit path, then `PORTER_CONFIG`, then
//! `<config_dir>/porter.toml`. Only the last one may be missing, in which
//! case the defaults apply. `PORTER_TREE_PATH` overrides `tree_path`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::build::OutputPaths;
use crate::consts::{
  CATALOG_INDEX_NAME, CONFIG_ENV, CONFIG_FILE_NAME, DEFAULT_BACKEND, DEFAULT_SYSTEM_PACKAGE, REPOSITORY_DIR_NAME,
  TREE_PATH_ENV,
};
use crate::gate::GatePolicy;
use crate::platform::CrossSettings;
use crate::platform::paths::config_dir;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config file not found: {0}")]
  NotFound(PathBuf),

  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("invalid configuration: {0}")]
  Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Root of the ports tree.
  pub tree_path: PathBuf,
  pub is_crossbuild_repository: bool,
  pub target_architecture: Option<String>,
  /// Untested ports build without confirmation.
  pub allow_untested: bool,
  /// Collaborator executable.
  pub backend: PathBuf,
  /// Package file the system probe inspects.
  pub system_package: PathBuf,
  /// Catalog index; defaults to `<repository>/catalog.json`.
  pub catalog: Option<PathBuf>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      tree_path: PathBuf::from("."),
      is_crossbuild_repository: false,
      target_architecture: None,
      allow_untested: false,
      backend: PathBuf::from(DEFAULT_BACKEND),
      system_package: PathBuf::from(DEFAULT_SYSTEM_PACKAGE),
      catalog: None,
    }
  }
}

impl Config {
  /// Load the configuration following the lookup order.
  pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
    let explicit = explicit
      .map(Path::to_path_buf)
      .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

    let mut config = match explicit {
      Some(path) if !path.exists() => return Err(ConfigError::NotFound(path)),
      Some(path) => Self::load_from(&path)?,
      None => match config_dir().map(|dir| dir.join(CONFIG_FILE_NAME)) {
        Some(path) if path.exists() => Self::load_from(&path)?,
        _ => {
          debug!("no config file, using defaults");
          Self::default()
        }
      },
    };

    if let Some(tree) = env::var_os(TREE_PATH_ENV) {
      debug!(tree = ?tree, "tree path overridden from environment");
      config.tree_path = PathBuf::from(tree);
    }

    config.validate()?;
    Ok(config)
  }

  /// Read one TOML file.
  pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
    debug!(path = ?path, "loading config");
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  fn validate(&mut self) -> Result<(), ConfigError> {
    if let Some(arch) = self.target_architecture.as_mut() {
      *arch = arch.trim().to_lowercase();
    }

    if self.is_crossbuild_repository && self.target_architecture.as_deref().is_none_or(str::is_empty) {
      return Err(ConfigError::Invalid(
        "a cross-build repository needs target_architecture".to_string(),
      ));
    }

    if self.tree_path.exists() {
      self.tree_path = dunce::canonicalize(&self.tree_path).map_err(|source| ConfigError::Read {
        path: self.tree_path.clone(),
        source,
      })?;
    }

    Ok(())
  }

  /// `<tree>/repository`
  pub fn repository_path(&self) -> PathBuf {
    self.tree_path.join(REPOSITORY_DIR_NAME)
  }

  pub fn catalog_path(&self) -> PathBuf {
    self
      .catalog
      .clone()
      .unwrap_or_else(|| self.repository_path().join(CATALOG_INDEX_NAME))
  }

  pub fn output_paths(&self) -> OutputPaths {
    OutputPaths::for_tree(&self.tree_path)
  }

  pub fn cross_settings(&self) -> CrossSettings {
    CrossSettings {
      is_cross_repository: self.is_crossbuild_repository,
      target_architecture: self.target_architecture.clone(),
    }
  }

  pub fn gate_policy(&self, assume_yes: bool) -> GatePolicy {
    GatePolicy {
      allow_untested: self.allow_untested,
      assume_yes,
    }
  }
}
