/// Application name, used for the configuration directory and env prefixes.
pub const APP_NAME: &str = "porter";

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "porter.toml";

/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_ENV: &str = "PORTER_CONFIG";

/// Environment variable overriding the configured tree path.
pub const TREE_PATH_ENV: &str = "PORTER_TREE_PATH";

/// Directory (below the tree) holding the package-info artifacts.
pub const REPOSITORY_DIR_NAME: &str = "repository";

/// Directory (below the tree) collecting built packages.
pub const PACKAGES_DIR_NAME: &str = "packages";

/// Subdirectory of the packages directory for ports the catalog no longer tracks.
pub const OBSOLETE_DIR_NAME: &str = ".obsolete";

/// File name of the catalog index inside the repository directory.
pub const CATALOG_INDEX_NAME: &str = "catalog.json";

/// Suffix of package-info artifacts.
pub const PACKAGE_INFO_SUFFIX: &str = ".PackageInfo";

/// Package file inspected by the system probe.
pub const DEFAULT_SYSTEM_PACKAGE: &str = "/system/packages/haiku.hpkg";

/// Root of the per-architecture cross sysroots.
pub const CROSS_SYSROOT_ROOT: &str = "/boot/cross-sysroot";

/// Collaborator executable used when the configuration names none.
pub const DEFAULT_BACKEND: &str = "porter-backend";
