//! Project configuration.
//!
//! Two JSON files at the project root drive a vore project:
//! - `config.json`: where the external tools live on this machine
//! - `package.json`: product name, publish channel and packaging rules
//!
//! Both are loaded once into a [`ProjectContext`] that every task shares
//! read-only.

mod package;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::consts::{CONFIG_FILE, PACKAGE_FILE};
use crate::dist::Platform;
use crate::layout::ProjectLayout;

pub use package::{ButlerMeta, PackMeta, PackageMeta, VoreMeta};

/// Errors that can occur while loading project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("{} not found", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },

  #[error("invalid package metadata in {}: {message}", path.display())]
  InvalidPackage { path: PathBuf, message: String },
}

/// Logical name of an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
  ScriptCompiler,
  TilemapExporter,
  SpriteExporter,
  RuntimePlayer,
  PushTool,
}

impl Tool {
  pub const ALL: [Tool; 5] = [
    Tool::ScriptCompiler,
    Tool::TilemapExporter,
    Tool::SpriteExporter,
    Tool::RuntimePlayer,
    Tool::PushTool,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Tool::ScriptCompiler => "script-compiler",
      Tool::TilemapExporter => "tilemap-exporter",
      Tool::SpriteExporter => "sprite-exporter",
      Tool::RuntimePlayer => "runtime-player",
      Tool::PushTool => "push-tool",
    }
  }
}

impl fmt::Display for Tool {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Executable paths for each [`Tool`]. Empty means "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Binaries {
  #[serde(default)]
  pub script_compiler: String,
  #[serde(default)]
  pub tilemap_exporter: String,
  #[serde(default)]
  pub sprite_exporter: String,
  #[serde(default)]
  pub runtime_player: String,
  #[serde(default)]
  pub push_tool: String,
}

impl Binaries {
  /// The configured executable for `tool`, or `None` if the entry is blank.
  pub fn path(&self, tool: Tool) -> Option<&Path> {
    let raw = match tool {
      Tool::ScriptCompiler => &self.script_compiler,
      Tool::TilemapExporter => &self.tilemap_exporter,
      Tool::SpriteExporter => &self.sprite_exporter,
      Tool::RuntimePlayer => &self.runtime_player,
      Tool::PushTool => &self.push_tool,
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() { None } else { Some(Path::new(trimmed)) }
  }
}

/// Optional per-platform overrides of the runtime download URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeUrls {
  #[serde(default)]
  pub windows: Option<String>,
  #[serde(default)]
  pub mac: Option<String>,
}

impl RuntimeUrls {
  pub fn get(&self, platform: Platform) -> Option<&str> {
    match platform {
      Platform::Windows => self.windows.as_deref(),
      Platform::Mac => self.mac.as_deref(),
      Platform::Linux => None,
    }
  }
}

/// Contents of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
  #[serde(default)]
  pub binaries: Binaries,

  #[serde(default)]
  pub runtime_urls: RuntimeUrls,
}

impl Config {
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Serialized form of the default config, every tool path blank.
  pub fn default_json() -> String {
    // Serializing plain strings and options cannot fail.
    serde_json::to_string_pretty(&Config::default()).unwrap_or_default() + "\n"
  }
}

/// Everything a task needs to know about the project, shared read-only.
#[derive(Debug, Clone)]
pub struct ProjectContext {
  pub layout: ProjectLayout,
  pub config: Config,
  pub package: PackageMeta,
}

impl ProjectContext {
  /// Load `package.json` and `config.json` from `root`.
  ///
  /// A missing `config.json` is not an error here: tasks that need a tool
  /// fail when they try to invoke it.
  pub fn load(root: &Path) -> Result<Self, ConfigError> {
    let package = PackageMeta::load(&root.join(PACKAGE_FILE))?;

    let config_path = root.join(CONFIG_FILE);
    let config = if config_path.exists() {
      Config::load(&config_path)?
    } else {
      warn!(path = %config_path.display(), "no tool config found; run `vore init` to create one");
      Config::default()
    };

    debug!(root = %root.display(), product = %package.name, "loaded project");

    Ok(Self {
      layout: ProjectLayout::new(root),
      config,
      package,
    })
  }

  pub fn archive_path(&self) -> PathBuf {
    self.layout.archive_path(&self.package.name)
  }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
  fs::read_to_string(path).map_err(|source| {
    if source.kind() == std::io::ErrorKind::NotFound {
      ConfigError::NotFound {
        path: path.to_path_buf(),
      }
    } else {
      ConfigError::Read {
        path: path.to_path_buf(),
        source,
      }
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn default_json_lists_every_tool() {
    let json = Config::default_json();
    for tool in Tool::ALL {
      assert!(json.contains(tool.as_str()), "missing {}", tool);
    }
  }

  #[test]
  fn blank_paths_are_not_configured() {
    let binaries = Binaries {
      script_compiler: "   ".to_string(),
      push_tool: "/usr/bin/butler".to_string(),
      ..Default::default()
    };

    assert!(binaries.path(Tool::ScriptCompiler).is_none());
    assert!(binaries.path(Tool::SpriteExporter).is_none());
    assert_eq!(binaries.path(Tool::PushTool), Some(Path::new("/usr/bin/butler")));
  }

  #[test]
  fn config_parses_partial_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");
    fs::write(
      &path,
      r#"{ "binaries": { "tilemap-exporter": "/opt/tiled" }, "runtime-urls": { "mac": "http://mirror/love.zip" } }"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.binaries.path(Tool::TilemapExporter), Some(Path::new("/opt/tiled")));
    assert!(config.binaries.path(Tool::ScriptCompiler).is_none());
    assert_eq!(config.runtime_urls.get(Platform::Mac), Some("http://mirror/love.zip"));
    assert_eq!(config.runtime_urls.get(Platform::Windows), None);
  }

  #[test]
  fn malformed_config_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
  }

  #[test]
  fn context_without_config_uses_defaults() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("package.json"), r#"{ "name": "hop" }"#).unwrap();

    let ctx = ProjectContext::load(temp.path()).unwrap();

    assert_eq!(ctx.config, Config::default());
    assert_eq!(ctx.archive_path(), temp.path().join("hop.love"));
  }

  #[test]
  fn context_requires_package_metadata() {
    let temp = TempDir::new().unwrap();

    assert!(matches!(
      ProjectContext::load(temp.path()),
      Err(ConfigError::NotFound { .. })
    ));
  }
}
