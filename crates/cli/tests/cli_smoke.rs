//! CLI smoke tests for studio.
//!
//! These tests verify that the CLI commands run without panicking, return
//! appropriate exit codes, and that the link/unlink flow works end to end
//! against an isolated temp project.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the studio binary.
fn studio_cmd() -> Command {
  cargo_bin_cmd!("studio")
}

/// Isolated test project with a working copy and an installed package.
struct TestProject {
  _temp: TempDir,
  root: PathBuf,
}

impl TestProject {
  fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("project");
    fs::create_dir_all(&root).unwrap();
    Self { _temp: temp, root }
  }

  fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.root.join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }

  /// Managed working copy plus a matching installed copy under vendor/.
  fn with_linked_setup(self) -> Self {
    self.write_file("../lib/widgets/composer.json", r#"{"name": "acme/widgets"}"#);
    self.write_file("../lib/widgets/src/lib.php", "<?php // working copy\n");
    self.write_file("vendor/acme/widgets/composer.json", r#"{"name": "acme/widgets"}"#);
    self.write_file("vendor/acme/widgets/src/lib.php", "<?php // installed 1.2.0\n");
    self.write_file("studio.json", r#"{"version": 2, "paths": ["../lib/widgets"]}"#);
    self
  }

  fn vendor_path(&self) -> PathBuf {
    self.root.join("vendor/acme/widgets")
  }

  fn studio_cmd(&self) -> Command {
    let mut cmd = studio_cmd();
    cmd.arg("--project").arg(&self.root);
    cmd
  }
}

fn is_link(path: &Path) -> bool {
  fs::symlink_metadata(path)
    .map(|meta| meta.file_type().is_symlink())
    .unwrap_or(false)
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  studio_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  studio_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("studio"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["link", "unlink", "status", "create"] {
    studio_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

// =============================================================================
// Link / Unlink flow
// =============================================================================

#[test]
fn link_then_unlink_round_trips() {
  let project = TestProject::new().with_linked_setup();

  project
    .studio_cmd()
    .arg("link")
    .assert()
    .success()
    .stderr(predicate::str::contains("[Studio] Creating link to ../lib/widgets"));

  assert!(is_link(&project.vendor_path()));
  assert!(project.root.join(".studio/acme-widgets").is_dir());

  project
    .studio_cmd()
    .arg("unlink")
    .assert()
    .success()
    .stderr(predicate::str::contains("[Studio] Removing linked path ../lib/widgets"));

  assert!(!is_link(&project.vendor_path()));
  assert_eq!(
    fs::read_to_string(project.vendor_path().join("src/lib.php")).unwrap(),
    "<?php // installed 1.2.0\n"
  );
  assert!(!project.root.join(".studio/acme-widgets").exists());
}

#[test]
fn link_in_a_project_without_configuration_is_quiet() {
  let project = TestProject::new();

  project.studio_cmd().arg("link").assert().success();
  assert!(!project.root.join(".studio").exists());
}

#[test]
fn link_reports_malformed_configuration() {
  let project = TestProject::new();
  project.write_file("studio.json", "{oops");

  project
    .studio_cmd()
    .arg("link")
    .assert()
    .failure()
    .stderr(predicate::str::contains("malformed configuration"));
}

// =============================================================================
// Status
// =============================================================================

#[test]
fn status_without_managed_paths_prints_hint() {
  let project = TestProject::new();

  project
    .studio_cmd()
    .arg("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("No managed paths"));
}

#[test]
fn status_shows_link_state_transitions() {
  let project = TestProject::new().with_linked_setup();

  project
    .studio_cmd()
    .arg("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("installed"));

  project.studio_cmd().arg("link").assert().success();

  project
    .studio_cmd()
    .arg("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("linked"));
}

#[test]
fn status_json_is_machine_readable() {
  let project = TestProject::new().with_linked_setup();

  let output = project.studio_cmd().arg("status").arg("--json").output().unwrap();
  assert!(output.status.success());

  let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(parsed["paths"][0]["package"], "acme/widgets");
  assert_eq!(parsed["paths"][0]["state"], "installed");
}

// =============================================================================
// Create
// =============================================================================

#[test]
fn create_rejects_names_without_a_vendor() {
  let project = TestProject::new();

  project
    .studio_cmd()
    .args(["create", "pkg", "--name", "noslash"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("vendor/name"));
}

#[test]
fn create_without_a_name_fails_in_non_interactive_mode() {
  let project = TestProject::new();

  project
    .studio_cmd()
    .args(["create", "pkg"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("non-interactive"));
}

#[test]
fn create_refuses_existing_target_paths() {
  let project = TestProject::new();
  project.write_file("pkg/keep.txt", "existing");

  project
    .studio_cmd()
    .args(["create", "pkg", "--name", "acme/pkg"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("already exists"));
}
