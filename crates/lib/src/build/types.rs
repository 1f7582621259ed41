//! Types for the build pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::{OBSOLETE_DIR_NAME, PACKAGES_DIR_NAME};
use crate::error::{PortError, Result};

/// A step performed by a collaborator on behalf of one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
  ParseRecipe,
  ResolveDependencies,
  Clean,
  Download,
  Unpack,
  Patch,
  Build,
}

impl Stage {
  pub fn as_str(&self) -> &'static str {
    match self {
      Stage::ParseRecipe => "parse-recipe",
      Stage::ResolveDependencies => "resolve-dependencies",
      Stage::Clean => "clean",
      Stage::Download => "download",
      Stage::Unpack => "unpack",
      Stage::Patch => "patch",
      Stage::Build => "build",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Which optional pipeline stages run, plus options passed on to each stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
  pub clean: bool,
  pub patch: bool,
  pub build: bool,
  pub package: bool,
  pub force: bool,
  pub quiet: bool,
  pub chroot: bool,
  pub jobs: usize,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      clean: false,
      patch: true,
      build: true,
      package: true,
      force: false,
      quiet: false,
      chroot: true,
      jobs: 1,
    }
  }
}

impl BuildOptions {
  /// Unpatched sources are never built or packaged.
  pub fn normalized(mut self) -> Self {
    if !self.patch {
      self.build = false;
      self.package = false;
    }
    self.jobs = self.jobs.max(1);
    self
  }

  /// Stages one pipeline invocation will run.
  pub fn pipeline(&self, parse_recipe: bool) -> PipelineState {
    PipelineState {
      parse_recipe,
      clean: self.clean,
      patch: self.patch,
      build: self.build,
      package: self.package,
    }
  }
}

/// Stages requested for one single-port pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineState {
  pub parse_recipe: bool,
  pub clean: bool,
  pub patch: bool,
  pub build: bool,
  pub package: bool,
}

impl PipelineState {
  /// The stages in execution order. Download and unpack always run.
  pub fn stages(&self) -> Vec<Stage> {
    let mut stages = Vec::with_capacity(6);
    if self.parse_recipe {
      stages.push(Stage::ParseRecipe);
    }
    if self.clean {
      stages.push(Stage::Clean);
    }
    stages.push(Stage::Download);
    stages.push(Stage::Unpack);
    if self.patch {
      stages.push(Stage::Patch);
    }
    if self.build {
      stages.push(Stage::Build);
    }
    stages
  }
}

/// Output directories below the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
  packages: PathBuf,
}

impl OutputPaths {
  pub fn new(packages: impl Into<PathBuf>) -> Self {
    Self {
      packages: packages.into(),
    }
  }

  /// `<tree>/packages`
  pub fn for_tree(tree: &Path) -> Self {
    Self::new(tree.join(PACKAGES_DIR_NAME))
  }

  /// Shared packages directory.
  pub fn packages(&self) -> &Path {
    &self.packages
  }

  /// Directory for packages of ports the catalog no longer tracks.
  pub fn obsolete(&self) -> PathBuf {
    self.packages.join(OBSOLETE_DIR_NAME)
  }

  /// Create the shared packages directory if needed.
  pub fn ensure_packages(&self) -> Result<&Path> {
    ensure_dir(&self.packages)?;
    Ok(&self.packages)
  }

  /// Create the obsolete directory if needed.
  pub fn ensure_obsolete(&self) -> Result<PathBuf> {
    let path = self.obsolete();
    ensure_dir(&path)?;
    Ok(path)
  }
}

fn ensure_dir(path: &Path) -> Result<()> {
  if path.is_dir() {
    return Ok(());
  }
  std::fs::create_dir_all(path).map_err(|source| PortError::Io {
    path: path.to_path_buf(),
    source,
  })
}

/// Outcome of building a port with its prerequisites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
  /// Port ids in the order their pipeline completed; the top-level port is last.
  pub built: Vec<String>,
  /// Directory the top-level port's packages were written to.
  pub target_path: PathBuf,
  /// Whether the top-level port was routed to the obsolete directory.
  pub obsolete: bool,
}

impl BuildReport {
  /// Prerequisites built before the top-level port.
  pub fn prerequisites(&self) -> &[String] {
    match self.built.split_last() {
      Some((_, rest)) => rest,
      None => &[],
    }
  }
}
