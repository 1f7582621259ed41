use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::PACKAGE_INFO_SUFFIX;

/// Support status a recipe declares for the current architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  Unsupported,
  Broken,
  Untested,
  Stable,
}

impl Status {
  pub fn as_str(&self) -> &'static str {
    match self {
      Status::Unsupported => "unsupported",
      Status::Broken => "broken",
      Status::Untested => "untested",
      Status::Stable => "stable",
    }
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Values the recipe subsystem extracts from a port's recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeInfo {
  #[serde(default)]
  pub revision: Option<String>,
  #[serde(default)]
  pub status: Option<Status>,
  #[serde(default)]
  pub keys: BTreeMap<String, String>,
}

/// A port known to the catalog.
///
/// Revision, status and recipe keys stay empty until the recipe is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPort {
  pub name: String,
  pub version: String,
  #[serde(default)]
  pub category: String,
  #[serde(default)]
  pub revision: Option<String>,
  #[serde(default)]
  pub status: Option<Status>,
  #[serde(default)]
  pub recipe_keys: BTreeMap<String, String>,
  #[serde(skip)]
  recipe_parsed: bool,
}

impl ResolvedPort {
  pub fn new(name: impl Into<String>, version: impl Into<String>, category: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      version: version.into(),
      category: category.into(),
      revision: None,
      status: None,
      recipe_keys: BTreeMap::new(),
      recipe_parsed: false,
    }
  }

  /// The port id (`name-version`).
  pub fn id(&self) -> String {
    format!("{}-{}", self.name, self.version)
  }

  /// `category::name-version`, as shown in build banners.
  pub fn qualified_name(&self) -> String {
    format!("{}::{}", self.category, self.id())
  }

  /// File name of the package-info artifact the catalog keeps for this port.
  pub fn package_info_name(&self) -> String {
    format!("{}{}", self.id(), PACKAGE_INFO_SUFFIX)
  }

  pub fn is_recipe_parsed(&self) -> bool {
    self.recipe_parsed
  }

  /// Fill in the fields the recipe subsystem provides.
  pub fn apply_recipe(&mut self, recipe: RecipeInfo) {
    if recipe.revision.is_some() {
      self.revision = recipe.revision;
    }
    if recipe.status.is_some() {
      self.status = recipe.status;
    }
    self.recipe_keys.extend(recipe.keys);
    self.recipe_parsed = true;
  }

  /// Status on the current architecture; a recipe without one is unsupported.
  pub fn status(&self) -> Status {
    self.status.unwrap_or(Status::Unsupported)
  }

  /// The recipe's informational message, if it declares a non-empty one.
  pub fn message(&self) -> Option<&str> {
    self.non_empty_key("MESSAGE")
  }

  /// Summary and description lines from the recipe.
  pub fn description(&self) -> Vec<&str> {
    ["SUMMARY", "DESCRIPTION"]
      .into_iter()
      .filter_map(|key| self.non_empty_key(key))
      .collect()
  }

  fn non_empty_key(&self, key: &str) -> Option<&str> {
    self
      .recipe_keys
      .get(key)
      .map(|v| v.trim())
      .filter(|v| !v.is_empty())
  }
}

impl fmt::Display for ResolvedPort {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.name, self.version)
  }
}

/// Path to a package-info artifact produced by dependency resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildDependencyRef {
  pub path: PathBuf,
}

impl BuildDependencyRef {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// Whether the artifact lives below `prefix`.
  pub fn is_within(&self, prefix: &Path) -> bool {
    self.path.starts_with(prefix)
  }

  /// Package id: the file name without its last extension.
  ///
  /// Returns `None` for a path without a file name or without an extension.
  pub fn package_id(&self) -> Option<&str> {
    let file_name = self.path.file_name()?.to_str()?;
    let (stem, _) = file_name.rsplit_once('.')?;
    Some(stem)
  }
}
