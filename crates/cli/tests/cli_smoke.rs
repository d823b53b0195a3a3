//! CLI smoke tests for vore.
//!
//! These run the binary against throwaway directories and need no external
//! tools.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn vore_cmd() -> Command {
  cargo_bin_cmd!("vore")
}

/// A project with package metadata and an all-blank tool config.
fn temp_project() -> TempDir {
  let temp = TempDir::new().unwrap();
  std::fs::write(temp.path().join("package.json"), r#"{ "name": "hop" }"#).unwrap();
  temp
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  vore_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"))
    .stdout(predicate::str::contains("publish"));
}

#[test]
fn version_flag_works() {
  vore_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("vore"));
}

#[test]
fn unknown_platform_is_rejected() {
  let temp = temp_project();

  vore_cmd()
    .arg("-C")
    .arg(temp.path())
    .args(["dist", "amiga"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown platform"));
}

// =============================================================================
// Init
// =============================================================================

#[test]
fn init_writes_blank_tool_config() {
  let temp = TempDir::new().unwrap();

  vore_cmd()
    .arg("-C")
    .arg(temp.path())
    .arg("init")
    .assert()
    .success()
    .stdout(predicate::str::contains("script-compiler"));

  let content = std::fs::read_to_string(temp.path().join("config.json")).unwrap();
  assert!(content.contains("\"push-tool\": \"\""));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
  let temp = TempDir::new().unwrap();
  std::fs::write(temp.path().join("config.json"), "{}").unwrap();

  vore_cmd()
    .arg("-C")
    .arg(temp.path())
    .arg("init")
    .assert()
    .failure()
    .stderr(predicate::str::contains("--force"));
  assert_eq!(std::fs::read_to_string(temp.path().join("config.json")).unwrap(), "{}");

  vore_cmd()
    .arg("-C")
    .arg(temp.path())
    .args(["init", "--force"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Replaced"));
  assert_ne!(std::fs::read_to_string(temp.path().join("config.json")).unwrap(), "{}");
}

// =============================================================================
// Plan
// =============================================================================

#[test]
fn plan_prints_waves_in_dependency_order() {
  let temp = temp_project();

  let output = vore_cmd()
    .arg("-C")
    .arg(temp.path())
    .args(["plan", "dist:linux"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let stdout = String::from_utf8_lossy(&output.stdout);
  let build = stdout.find("build:moon").unwrap();
  let zip = stdout.find("dist:zip").unwrap();
  let linux = stdout.find("dist:linux").unwrap();
  assert!(build < zip && zip < linux, "{stdout}");
  assert!(!stdout.contains("download-love"));
}

#[test]
fn plan_unknown_target_fails() {
  let temp = temp_project();

  vore_cmd()
    .arg("-C")
    .arg(temp.path())
    .args(["plan", "deploy"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown task: deploy"));
}

#[test]
fn commands_need_package_metadata() {
  let temp = TempDir::new().unwrap();

  vore_cmd()
    .arg("-C")
    .arg(temp.path())
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("package.json"));
}

// =============================================================================
// Clean & Publish
// =============================================================================

#[test]
fn clean_without_outputs_is_a_no_op() {
  let temp = TempDir::new().unwrap();

  vore_cmd()
    .arg("-C")
    .arg(temp.path())
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to clean"));
}

#[test]
fn publish_without_game_fails_before_building() {
  let temp = temp_project();

  vore_cmd()
    .arg("-C")
    .arg(temp.path())
    .args(["publish", "linux"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("vore.butler.game"));

  assert!(!temp.path().join("build").exists());
}
