use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn pack_writes_archive_at_project_root() {
  let env = TestEnv::new();

  env
    .vore()
    .arg("pack")
    .assert()
    .success()
    .stdout(predicate::str::contains("hop.love"));

  let bytes = std::fs::read(env.root().join("hop.love")).unwrap();
  assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn dist_linux_copies_archive() {
  let env = TestEnv::new();

  env.vore().args(["dist", "linux"]).assert().success();

  let packed = std::fs::read(env.root().join("hop.love")).unwrap();
  let bundled = std::fs::read(env.root().join("dist-linux/hop.love")).unwrap();
  assert_eq!(packed, bundled);
  assert!(!env.root().join("dist-win").exists());
}

#[test]
fn publish_linux_pushes_to_channel() {
  let env = TestEnv::new();

  env
    .vore()
    .args(["publish", "linux"])
    .assert()
    .success()
    .stdout(predicate::str::contains("me/hop:linux"));

  let log = std::fs::read_to_string(env.log()).unwrap();
  let push = log.lines().find(|l| l.starts_with("butler")).unwrap();
  assert!(push.ends_with("me/hop:linux"), "{push}");
  assert!(push.contains("dist-linux"), "{push}");
}
