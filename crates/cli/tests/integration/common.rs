//! Shared test helpers for CLI integration tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Catalog index of the test tree.
pub const CATALOG: &str = r#"{
  "ports": [
    {"name": "app", "version": "1.0", "category": "app-misc"},
    {"name": "lib", "version": "2.0", "category": "dev-libs"},
    {"name": "oldtool", "version": "0.1", "category": "app-misc"}
  ],
  "packages": {"lib_devel-2.0": "lib-2.0"}
}"#;

/// Backend that logs each call; `app` needs `lib` through its devel package.
const BACKEND: &str = r#"
echo "$1 $2" >> "$PORTER_TEST_LOG"
case "$1" in
  parse-recipe)
    if [ "$2" = "lib-2.0" ] && [ -n "$PORTER_TEST_BROKEN_LIB" ]; then
      echo '{"revision": "1", "status": "broken"}'
    else
      echo '{"revision": "1", "status": "stable", "keys": {"SUMMARY": "A port used in tests"}}'
    fi
    ;;
  resolve-build-dependencies)
    if [ "$2" = "app-1.0" ]; then
      echo "{\"dependencies\": [\"$PORTER_REPOSITORY/lib_devel-2.0.PackageInfo\", \"/boot/system/packages/gcc-13.PackageInfo\"], \"repository\": \"$PORTER_REPOSITORY\"}"
    else
      echo "{\"repository\": \"$PORTER_REPOSITORY\"}"
    fi
    ;;
  unpack)
    [ "$2" = "$PORTER_TEST_FAIL_UNPACK" ] && exit 2
    ;;
  build)
    mkdir -p "$PORTER_TARGET" && touch "$PORTER_TARGET/$2.hpkg"
    ;;
esac
exit 0
"#;

/// Host package listing printed by the fake `package` command.
pub const X86_64_LISTING: &str = "\
package-attributes:
  name: haiku
  architecture: x86_64
  provides: haiku = r1~beta5
";

/// Isolated test environment: a ports tree, a backend script, a fake
/// `package` command on `PATH` and a config file pointing at all of them.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  pub fn new() -> Self {
    Self::with_config("")
  }

  /// Extra TOML lines are appended to the generated config.
  pub fn with_config(extra: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let env = Self {
      config_path: temp.path().join("porter.toml"),
      temp,
    };

    env.write_file("tree/repository/catalog.json", CATALOG);
    env.write_file("tree/repository/app-1.0.PackageInfo", "");
    env.write_file("tree/repository/lib-2.0.PackageInfo", "");
    env.write_script("bin/backend", BACKEND);
    env.set_listing(X86_64_LISTING);

    let config = format!(
      "tree_path = \"{}\"\nbackend = \"{}\"\n{}",
      env.tree_path().display(),
      env.temp.path().join("bin/backend").display(),
      extra
    );
    fs::write(&env.config_path, config).unwrap();
    env
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }

  fn write_script(&self, relative_path: &str, body: &str) {
    self.write_file(relative_path, &format!("#!/bin/sh\n{}\n", body));
    let path = self.temp.path().join(relative_path);
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  }

  /// Replace what the fake `package list` prints.
  pub fn set_listing(&self, listing: &str) {
    self.write_script("bin/package", &format!("cat <<'EOF'\n{}EOF", listing));
  }

  pub fn tree_path(&self) -> PathBuf {
    let p = self.temp.path().join("tree");
    fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn packages_path(&self) -> PathBuf {
    self.tree_path().join("packages")
  }

  pub fn log_path(&self) -> PathBuf {
    self.temp.path().join("backend.log")
  }

  /// Backend calls in order, as `<operation> <port id>`.
  pub fn log(&self) -> Vec<String> {
    fs::read_to_string(self.log_path())
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  /// Get a pre-configured Command for the porter binary.
  ///
  /// Sets environment variables for isolated testing:
  /// - `PATH`: the fake `package` command first
  /// - `PORTER_CONFIG`: the generated config file
  /// - `XDG_CONFIG_HOME`: an empty directory
  /// - `PORTER_TEST_LOG`: where the backend logs its calls
  pub fn porter_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("porter");
    cmd.env("PATH", search_path(&self.temp.path().join("bin")));
    cmd.env("PORTER_CONFIG", &self.config_path);
    cmd.env("XDG_CONFIG_HOME", self.temp.path().join("config"));
    cmd.env("PORTER_TEST_LOG", self.log_path());
    cmd.env_remove("PORTER_TREE_PATH");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}

fn search_path(first: &Path) -> String {
  match std::env::var("PATH") {
    Ok(path) if !path.is_empty() => format!("{}:{}", first.display(), path),
    _ => format!("{}:/usr/bin:/bin", first.display()),
  }
}
