//! Tests for the command backend against shell scripts.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use porter_lib::backend::{BackendError, BuildEnv, BuildMechanics, CommandBackend, DependencySolver, RecipeParser};
use porter_lib::port::{ResolvedPort, Status};

use super::common::{TestTree, write_script};

fn port() -> ResolvedPort {
  ResolvedPort::new("zlib", "1.3", "sys-libs")
}

fn env() -> BuildEnv {
  let mut variables = BTreeMap::new();
  variables.insert("targetArchitecture".to_string(), "x86_64".to_string());
  BuildEnv {
    variables,
    force: true,
    quiet: false,
    chroot: false,
  }
}

mod recipe {
  use super::*;

  #[test]
  fn parses_recipe_json_from_stdout() {
    let tree = TestTree::new();
    let script = write_script(
      tree.root(),
      "backend",
      r#"echo '{"revision": "2", "status": "untested", "keys": {"SUMMARY": "compression library"}}'"#,
    );

    let recipe = CommandBackend::new(&script).parse_recipe(&port(), &env()).unwrap();

    assert_eq!(recipe.revision.as_deref(), Some("2"));
    assert_eq!(recipe.status, Some(Status::Untested));
    assert_eq!(recipe.keys["SUMMARY"], "compression library");
  }

  #[test]
  fn garbage_output_is_invalid() {
    let tree = TestTree::new();
    let script = write_script(tree.root(), "backend", "echo 'not json'");

    let err = CommandBackend::new(&script).parse_recipe(&port(), &env()).unwrap_err();
    assert!(matches!(err, BackendError::InvalidOutput { .. }), "{}", err);
  }

  #[test]
  fn non_zero_exit_reports_the_code() {
    let tree = TestTree::new();
    let script = write_script(tree.root(), "backend", "exit 3");

    let err = CommandBackend::new(&script).parse_recipe(&port(), &env()).unwrap_err();
    match err {
      BackendError::CmdFailed { cmd, code } => {
        assert_eq!(code, Some(3));
        assert!(cmd.ends_with("parse-recipe zlib-1.3"), "{}", cmd);
      }
      other => panic!("unexpected error: {}", other),
    }
  }

  #[test]
  fn missing_program_fails_to_spawn() {
    let err = CommandBackend::new("/nonexistent/porter-backend")
      .parse_recipe(&port(), &env())
      .unwrap_err();
    assert!(matches!(err, BackendError::Spawn { .. }));
  }
}

mod dependencies {
  use super::*;

  #[test]
  fn solver_receives_paths_and_reports_prefix() {
    let tree = TestTree::new();
    let script = write_script(
      tree.root(),
      "backend",
      r#"echo "{\"dependencies\": [\"$PORTER_REPOSITORY/a-1.PackageInfo\"], \"repository\": \"$PORTER_REPOSITORY\"}""#,
    );
    let packages = tree.root().join("packages");

    let (deps, prefix) = CommandBackend::new(&script)
      .resolve_build_dependencies(&port(), &tree.repository(), &packages, &env())
      .unwrap();

    assert_eq!(prefix, tree.repository());
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].package_id(), Some("a-1"));
    assert!(deps[0].is_within(&prefix));
  }

  #[test]
  fn missing_dependency_list_is_empty() {
    let tree = TestTree::new();
    let script = write_script(tree.root(), "backend", r#"echo '{"repository": "/r"}'"#);

    let (deps, prefix) = CommandBackend::new(&script)
      .resolve_build_dependencies(&port(), Path::new("/r"), Path::new("/p"), &env())
      .unwrap();

    assert!(deps.is_empty());
    assert_eq!(prefix, Path::new("/r"));
  }
}

mod stages {
  use super::*;

  #[test]
  fn stage_sees_operation_port_and_settings() {
    let tree = TestTree::new();
    let log = tree.log_path();
    let script = write_script(
      tree.root(),
      "backend",
      &format!(
        r#"echo "$1 $2 $PORTER_PORT_NAME $PORTER_FORCE $PORTER_CHROOT $targetArchitecture" >> '{}'"#,
        log.display()
      ),
    );

    CommandBackend::new(&script).download_source(&port(), &env()).unwrap();

    assert_eq!(tree.log(), vec!["download zlib-1.3 zlib 1 0 x86_64"]);
  }

  #[test]
  fn build_receives_target_and_package_flag() {
    let tree = TestTree::new();
    let log = tree.log_path();
    let script = write_script(
      tree.root(),
      "backend",
      &format!(
        r#"echo "$1 $PORTER_PACKAGE $PORTER_TARGET" >> '{}'"#,
        log.display()
      ),
    );
    let packages = tree.root().join("packages");
    let target = packages.join(".obsolete");

    CommandBackend::new(&script)
      .build(&port(), &env(), &packages, false, &target)
      .unwrap();

    assert_eq!(tree.log(), vec![format!("build 0 {}", target.display())]);
  }

  #[test]
  fn failing_stage_is_an_error() {
    let tree = TestTree::new();
    let script = write_script(tree.root(), "backend", r#"[ "$1" = "patch" ] && exit 1; exit 0"#);
    let backend = CommandBackend::new(&script);

    backend.unpack_source(&port(), &env()).unwrap();
    let err = backend.patch_source(&port(), &env()).unwrap_err();
    assert!(matches!(err, BackendError::CmdFailed { code: Some(1), .. }));
  }

  #[test]
  fn clean_runs_the_clean_operation() {
    let tree = TestTree::new();
    let marker = tree.root().join("cleaned");
    let script = write_script(
      tree.root(),
      "backend",
      &format!(r#"[ "$1" = "clean" ] && touch '{}'"#, marker.display()),
    );

    CommandBackend::new(&script).clean_work_directory(&port(), &env()).unwrap();
    assert!(fs::metadata(&marker).is_ok());
  }
}
