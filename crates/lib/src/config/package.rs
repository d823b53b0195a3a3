//! `package.json` metadata.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ConfigError, read_file};
use crate::consts::{DEFAULT_PACK_EXCLUDES, STOCK_EXECUTABLES};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButlerMeta {
  /// `user/game` prefix of the push destination.
  pub game: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackMeta {
  #[serde(default)]
  pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoreMeta {
  #[serde(default)]
  pub butler: Option<ButlerMeta>,

  #[serde(default)]
  pub pack: PackMeta,
}

/// The subset of `package.json` vore cares about. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMeta {
  pub name: String,

  #[serde(default)]
  pub vore: VoreMeta,
}

impl PackageMeta {
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = read_file(path)?;
    let meta: PackageMeta = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    // The name becomes a file name for the archive and the fused executable.
    if meta.name.trim().is_empty() || meta.name.contains(['/', '\\']) {
      return Err(ConfigError::InvalidPackage {
        path: path.to_path_buf(),
        message: format!("`name` must be a non-empty file name, got {:?}", meta.name),
      });
    }

    if STOCK_EXECUTABLES.iter().any(|stock| meta.name.eq_ignore_ascii_case(stock)) {
      return Err(ConfigError::InvalidPackage {
        path: path.to_path_buf(),
        message: format!("`name` {:?} collides with a runtime executable", meta.name),
      });
    }

    Ok(meta)
  }

  /// Push destination prefix, if publishing is configured.
  pub fn publish_game(&self) -> Option<&str> {
    self
      .vore
      .butler
      .as_ref()
      .map(|b| b.game.trim())
      .filter(|g| !g.is_empty())
  }

  /// Archive exclusion patterns, relative to the build root.
  pub fn pack_excludes(&self) -> Vec<String> {
    match &self.vore.pack.exclude {
      Some(patterns) => patterns.clone(),
      None => DEFAULT_PACK_EXCLUDES.iter().map(|p| p.to_string()).collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  fn write_package(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("package.json");
    fs::write(&path, content).unwrap();
    (temp, path)
  }

  #[test]
  fn reads_butler_game_and_ignores_unknown_keys() {
    let (_temp, path) = write_package(
      r#"{
        "name": "hop",
        "version": "1.0.0",
        "devDependencies": { "gulp": "^3.9.1" },
        "vore": { "butler": { "game": "me/hop" } }
      }"#,
    );

    let meta = PackageMeta::load(&path).unwrap();

    assert_eq!(meta.name, "hop");
    assert_eq!(meta.publish_game(), Some("me/hop"));
    assert_eq!(meta.pack_excludes(), vec!["genobjectxml.lua", "**/*.tmx", "**/*.ase"]);
  }

  #[test]
  fn custom_excludes_replace_defaults() {
    let (_temp, path) = write_package(r#"{ "name": "hop", "vore": { "pack": { "exclude": ["*.md"] } } }"#);

    let meta = PackageMeta::load(&path).unwrap();

    assert_eq!(meta.pack_excludes(), vec!["*.md"]);
    assert_eq!(meta.publish_game(), None);
  }

  #[test]
  fn rejects_names_that_are_not_file_names() {
    let (_temp, path) = write_package(r#"{ "name": "../hop" }"#);
    assert!(matches!(
      PackageMeta::load(&path),
      Err(ConfigError::InvalidPackage { .. })
    ));

    let (_temp, path) = write_package(r#"{ "name": "  " }"#);
    assert!(matches!(
      PackageMeta::load(&path),
      Err(ConfigError::InvalidPackage { .. })
    ));
  }

  #[test]
  fn rejects_runtime_executable_names() {
    for name in ["love", "lovec", "LOVE"] {
      let (_temp, path) = write_package(&format!(r#"{{ "name": "{}" }}"#, name));
      assert!(
        matches!(PackageMeta::load(&path), Err(ConfigError::InvalidPackage { .. })),
        "{name} accepted"
      );
    }
  }
}
