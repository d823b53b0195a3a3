use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn build_transpiles_every_asset_kind() {
  let env = TestEnv::new();

  env
    .vore()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("build:moon"));

  let root = env.root();
  assert_eq!(
    std::fs::read_to_string(root.join("build/a.lua")).unwrap(),
    "return \"a.moon\"\n"
  );
  assert!(root.join("build/util.lua").exists());
  assert!(root.join("build/data/b_tmx.lua").exists());
  assert!(root.join("build/c.ase.png").exists());
  assert!(root.join("build/c.ase.json").exists());
  assert!(root.join("build/data/d.wav").exists());
}

#[test]
fn second_build_invokes_no_tools() {
  let env = TestEnv::new();

  env.vore().arg("build").assert().success();
  let first = env.calls();
  assert_eq!(first, 3);

  env.vore().arg("build").assert().success();
  assert_eq!(env.calls(), first);
}

#[test]
fn failing_compiler_exits_non_zero_with_its_stderr() {
  let env = TestEnv::new();
  let moonc = env.script("moonc", "echo 'a.moon:1: syntax error' >&2\nexit 2");
  env.write_config(&moonc);

  env
    .vore()
    .arg("pack")
    .assert()
    .failure()
    .stderr(predicate::str::contains("build:moon failed"))
    .stderr(predicate::str::contains("syntax error"));

  assert!(!env.root().join("hop.love").exists());
  // Sibling batches still ran.
  assert!(env.root().join("build/data/d.wav").exists());
}

#[test]
fn clean_removes_build_outputs() {
  let env = TestEnv::new();
  env.vore().arg("pack").assert().success();
  assert!(env.root().join("hop.love").exists());

  env
    .vore()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed build"));

  assert!(!env.root().join("build").exists());
  assert!(!env.root().join("hop.love").exists());
  assert!(env.root().join("src/a.moon").exists());
}

#[test]
fn run_builds_then_launches_the_player() {
  let env = TestEnv::new();

  env.vore().arg("run").assert().success();

  let log = std::fs::read_to_string(env.log()).unwrap();
  assert!(log.lines().last().unwrap().starts_with("love build"), "{log}");
}
