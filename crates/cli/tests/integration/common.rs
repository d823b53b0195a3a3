//! Shared test helpers for CLI integration tests.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated project with shell-script stand-ins for every external tool.
///
/// Each tool appends one line per call to `calls.log` in the tools directory.
pub struct TestEnv {
  pub project: TempDir,
  pub tools: TempDir,
}

impl TestEnv {
  /// A project with one asset of each kind and working tools.
  pub fn new() -> Self {
    let env = Self::empty();
    env.write_file("package.json", r#"{ "name": "hop", "vore": { "butler": { "game": "me/hop" } } }"#);
    env.write_file("src/a.moon", "x = 1");
    env.write_file("src/util.lua", "return {}");
    env.write_file("data/b.tmx", "<map/>");
    env.write_file("c.ase", "ASE");
    env.write_file("data/d.wav", "RIFF");
    env.write_config(&env.script(
      "moonc",
      "printf 'return \"%s\"\\n' \"$(basename \"$2\")\"",
    ));
    env
  }

  pub fn empty() -> Self {
    Self {
      project: TempDir::new().unwrap(),
      tools: TempDir::new().unwrap(),
    }
  }

  pub fn root(&self) -> &Path {
    self.project.path()
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.root().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn log(&self) -> PathBuf {
    self.tools.path().join("calls.log")
  }

  /// Lines logged by the tool stand-ins so far.
  pub fn calls(&self) -> usize {
    std::fs::read_to_string(self.log())
      .map(|s| s.lines().count())
      .unwrap_or(0)
  }

  /// Write an executable script that logs its call, then runs `body`.
  pub fn script(&self, name: &str, body: &str) -> PathBuf {
    let path = self.tools.path().join(name);
    let content = format!("#!/bin/sh\necho \"{} $*\" >> '{}'\n{}\n", name, self.log().display(), body);
    std::fs::write(&path, content).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
  }

  /// Point `config.json` at `moonc` and at stand-ins for the other tools.
  pub fn write_config(&self, moonc: &Path) {
    let tiled = self.script("tiled", "echo 'return {}' > \"$3\"");
    let aseprite = self.script("aseprite", "printf 'PNG' > \"$7\"\nprintf '[]' > \"$9\"");
    let love = self.script("love", "exit 0");
    let butler = self.script("butler", "exit 0");
    let config = format!(
      r#"{{
  "binaries": {{
    "script-compiler": "{}",
    "tilemap-exporter": "{}",
    "sprite-exporter": "{}",
    "runtime-player": "{}",
    "push-tool": "{}"
  }}
}}"#,
      moonc.display(),
      tiled.display(),
      aseprite.display(),
      love.display(),
      butler.display()
    );
    self.write_file("config.json", &config);
  }

  /// The `vore` binary, run against this project.
  pub fn vore(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("vore");
    cmd.arg("-C").arg(self.root());
    cmd
  }
}
