//! Build and fetch command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn build_runs_prerequisites_first() {
  let env = TestEnv::new();

  env
    .porter_cmd()
    .args(["build", "app"])
    .assert()
    .success()
    .stdout(predicate::str::contains("The following required ports will be built first"))
    .stdout(predicate::str::contains("dev-libs::lib-2.0"))
    .stdout(predicate::str::contains("Build complete"))
    .stdout(predicate::str::contains("Ports built: 2"));

  assert_eq!(
    env.log(),
    vec![
      "parse-recipe app-1.0",
      "resolve-build-dependencies app-1.0",
      "parse-recipe lib-2.0",
      "download lib-2.0",
      "unpack lib-2.0",
      "patch lib-2.0",
      "build lib-2.0",
      "download app-1.0",
      "unpack app-1.0",
      "patch app-1.0",
      "build app-1.0",
    ]
  );
  assert!(env.packages_path().join("lib-2.0.hpkg").exists());
  assert!(env.packages_path().join("app-1.0.hpkg").exists());
}

#[test]
fn no_dependencies_builds_only_the_named_port() {
  let env = TestEnv::new();

  env
    .porter_cmd()
    .args(["build", "app", "--no-dependencies"])
    .assert()
    .success();

  assert_eq!(
    env.log(),
    vec![
      "parse-recipe app-1.0",
      "download app-1.0",
      "unpack app-1.0",
      "patch app-1.0",
      "build app-1.0",
    ]
  );
}

#[test]
fn clean_and_no_patch_shape_the_pipeline() {
  let env = TestEnv::new();

  env
    .porter_cmd()
    .args(["build", "lib", "--clean", "--no-patch"])
    .assert()
    .success();

  assert_eq!(
    env.log(),
    vec![
      "parse-recipe lib-2.0",
      "resolve-build-dependencies lib-2.0",
      "clean lib-2.0",
      "download lib-2.0",
      "unpack lib-2.0",
    ]
  );
}

#[test]
fn obsolete_port_is_written_to_obsolete_dir() {
  let env = TestEnv::new();

  env
    .porter_cmd()
    .args(["build", "oldtool"])
    .assert()
    .success()
    .stderr(predicate::str::contains("obsolete"));

  assert!(env.packages_path().join(".obsolete").join("oldtool-0.1.hpkg").exists());
  assert!(!env.packages_path().join("oldtool-0.1.hpkg").exists());
}

#[test]
fn failing_stage_aborts_the_run() {
  let env = TestEnv::new();

  env
    .porter_cmd()
    .args(["build", "app"])
    .env("PORTER_TEST_FAIL_UNPACK", "lib-2.0")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unpack failed for lib-2.0"));

  assert!(!env.log().iter().any(|line| line.ends_with("app-1.0") && line.starts_with("download")));
}

#[test]
fn unstable_port_needs_confirmation() {
  let env = TestEnv::new();

  env
    .porter_cmd()
    .args(["build", "lib"])
    .env("PORTER_TEST_BROKEN_LIB", "1")
    .assert()
    .failure()
    .stderr(predicate::str::contains("This port is broken on this architecture."))
    .stderr(predicate::str::contains("build declined"));

  assert_eq!(env.log(), vec!["parse-recipe lib-2.0"]);
}

#[test]
fn yes_accepts_unstable_port() {
  let env = TestEnv::new();

  env
    .porter_cmd()
    .args(["build", "lib", "--yes"])
    .env("PORTER_TEST_BROKEN_LIB", "1")
    .assert()
    .success();
}

#[test]
fn revision_mismatch_fails() {
  let env = TestEnv::new();

  env
    .porter_cmd()
    .args(["build", "app-1.0-7"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("isn't available in revision 7"));
}

#[test]
fn unknown_port_fails() {
  let env = TestEnv::new();

  env
    .porter_cmd()
    .args(["build", "nope"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("nope not found"));
}

#[test]
fn malformed_specifier_fails() {
  let env = TestEnv::new();

  env
    .porter_cmd()
    .args(["build", "a-b-c-d"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid port specifier"));
}

#[test]
fn every_port_is_validated_before_any_build() {
  let env = TestEnv::new();

  env
    .porter_cmd()
    .args(["build", "app", "nope"])
    .assert()
    .failure();

  assert_eq!(env.log(), vec!["parse-recipe app-1.0"]);
}

#[test]
fn about_prints_the_description() {
  let env = TestEnv::new();

  env
    .porter_cmd()
    .args(["fetch", "app", "--about"])
    .assert()
    .success()
    .stdout(predicate::str::contains("A port used in tests"));
}

#[test]
fn fetch_never_builds() {
  let env = TestEnv::new();
  env.write_file("ports.txt", "lib\n\napp-1.0\n");

  env
    .porter_cmd()
    .arg("fetch")
    .arg("--ports-file")
    .arg(env.temp.path().join("ports.txt"))
    .assert()
    .success()
    .stdout(predicate::str::contains("Sources prepared"));

  let log = env.log();
  assert!(log.iter().all(|line| !line.starts_with("build")));
  assert!(log.contains(&"patch app-1.0".to_string()));
  assert!(log.contains(&"patch lib-2.0".to_string()));
}
