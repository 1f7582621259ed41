//! Building through a session with the JSON catalog and a script backend.

use porter_lib::backend::CommandBackend;
use porter_lib::build::{BuildOptions, Stage};
use porter_lib::gate::GatePolicy;
use porter_lib::port::Status;
use porter_lib::{PortError, Session};

use super::common::{FixedAnswer, TestTree, native_context, write_script};

const INDEX: &str = r#"{
  "ports": [
    {"name": "app", "version": "1.0", "category": "app-misc"},
    {"name": "lib", "version": "2.0", "category": "dev-libs"},
    {"name": "oldtool", "version": "0.1", "category": "app-misc"}
  ],
  "packages": {"lib_devel-2.0": "lib-2.0"}
}"#;

/// Logs every call; `app` needs `lib` (via its devel package) and a system compiler.
const BACKEND: &str = r#"
echo "$1 $2 $PORTER_TARGET" | sed 's/ *$//' >> "$PORTER_TEST_LOG"
case "$1" in
  parse-recipe)
    if [ "$2" = "lib-2.0" ] && [ -n "$PORTER_TEST_BROKEN_LIB" ]; then
      echo '{"revision": "1", "status": "broken"}'
    else
      echo '{"revision": "1", "status": "stable"}'
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
esac
exit 0
"#;

struct Fixture {
  tree: TestTree,
  backend: CommandBackend,
}

fn fixture() -> Fixture {
  let tree = TestTree::new();
  tree.write_index(INDEX);
  tree.add_package_info("app-1.0");
  tree.add_package_info("lib-2.0");
  let backend = CommandBackend::new(write_script(tree.root(), "backend", BACKEND));
  Fixture { tree, backend }
}

/// Run `f` with the backend log pointed into the tree.
fn with_log<R>(fixture: &Fixture, vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
  let log = fixture.tree.log_path();
  let mut all = vec![("PORTER_TEST_LOG", Some(log.to_str().unwrap().to_string()))];
  for (name, value) in vars {
    all.push((*name, Some(value.to_string())));
  }
  temp_env::with_vars(all, f)
}

#[test]
#[serial_test::serial]
fn builds_prerequisite_then_target() {
  let fx = fixture();
  let catalog = fx.tree.catalog();
  let confirmer = FixedAnswer("");
  let session = Session::new(&catalog, &fx.backend, &confirmer, native_context(), fx.tree.paths());

  let report = with_log(&fx, &[], || {
    let mut port = session.resolve("app").unwrap();
    session.validate(&mut port, Some("1")).unwrap();
    session.build_with_dependencies(&mut port).unwrap()
  });

  let packages = fx.tree.paths().packages().display().to_string();
  assert_eq!(report.built, vec!["lib-2.0", "app-1.0"]);
  assert!(!report.obsolete);
  assert_eq!(
    fx.tree.log(),
    vec![
      "parse-recipe app-1.0".to_string(),
      "resolve-build-dependencies app-1.0".to_string(),
      "parse-recipe lib-2.0".to_string(),
      "download lib-2.0".to_string(),
      "unpack lib-2.0".to_string(),
      "patch lib-2.0".to_string(),
      format!("build lib-2.0 {}", packages),
      "download app-1.0".to_string(),
      "unpack app-1.0".to_string(),
      "patch app-1.0".to_string(),
      format!("build app-1.0 {}", packages),
    ]
  );
}

#[test]
#[serial_test::serial]
fn obsolete_port_goes_to_obsolete_dir() {
  let fx = fixture();
  let catalog = fx.tree.catalog();
  let confirmer = FixedAnswer("");
  let session = Session::new(&catalog, &fx.backend, &confirmer, native_context(), fx.tree.paths());

  let report = with_log(&fx, &[], || {
    let mut port = session.resolve("oldtool").unwrap();
    session.build_with_dependencies(&mut port).unwrap()
  });

  let obsolete = fx.tree.paths().obsolete();
  assert!(report.obsolete);
  assert!(obsolete.is_dir());
  assert_eq!(
    fx.tree.log().last().cloned(),
    Some(format!("build oldtool-0.1 {}", obsolete.display()))
  );
}

#[test]
#[serial_test::serial]
fn failing_prerequisite_stops_the_run() {
  let fx = fixture();
  let catalog = fx.tree.catalog();
  let confirmer = FixedAnswer("");
  let session = Session::new(&catalog, &fx.backend, &confirmer, native_context(), fx.tree.paths());

  let err = with_log(&fx, &[("PORTER_TEST_FAIL_UNPACK", "lib-2.0")], || {
    let mut port = session.resolve("app").unwrap();
    session.build_with_dependencies(&mut port).unwrap_err()
  });

  assert!(matches!(
    err,
    PortError::StageFailure {
      stage: Stage::Unpack,
      ..
    }
  ));
  assert!(!fx.tree.log().iter().any(|line| line.starts_with("download app-1.0")));
}

#[test]
#[serial_test::serial]
fn declined_status_stops_before_building() {
  let fx = fixture();
  let catalog = fx.tree.catalog();
  let confirmer = FixedAnswer("no");
  let session = Session::new(&catalog, &fx.backend, &confirmer, native_context(), fx.tree.paths())
    .with_policy(GatePolicy::default());

  let err = with_log(&fx, &[("PORTER_TEST_BROKEN_LIB", "1")], || {
    let mut port = session.resolve("lib").unwrap();
    session.validate(&mut port, None).unwrap_err()
  });

  assert!(matches!(
    err,
    PortError::UnsupportedStatusDeclined {
      status: Status::Broken,
      ..
    }
  ));
  assert_eq!(fx.tree.log(), vec!["parse-recipe lib-2.0"]);
}

#[test]
#[serial_test::serial]
fn fetch_style_options_skip_the_build() {
  let fx = fixture();
  let catalog = fx.tree.catalog();
  let confirmer = FixedAnswer("");
  let session = Session::new(&catalog, &fx.backend, &confirmer, native_context(), fx.tree.paths())
    .with_options(BuildOptions {
      build: false,
      package: false,
      ..Default::default()
    });

  with_log(&fx, &[], || {
    let mut port = session.resolve("lib").unwrap();
    let packages = session.paths().packages().to_path_buf();
    session.build_single(&mut port, true, &packages).unwrap();
  });

  assert_eq!(
    fx.tree.log(),
    vec!["parse-recipe lib-2.0", "download lib-2.0", "unpack lib-2.0", "patch lib-2.0"]
  );
}
