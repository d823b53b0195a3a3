//! Generate a default tool configuration.
//!
//! This module provides the core logic for the `vore init` command, which
//! writes a `config.json` listing every external tool with a blank path.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::consts::CONFIG_FILE;

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("file already exists: {} (use --force to overwrite)", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },
}

/// Options for generating the default config.
pub struct InitOptions {
  /// Project root the config is written into
  pub project_dir: PathBuf,
  /// Overwrite an existing `config.json`
  pub force: bool,
}

/// Result of a successful initialization.
#[derive(Debug)]
pub struct InitResult {
  /// Path to the written config file
  pub config_path: PathBuf,
  /// Whether an existing file was replaced
  pub overwritten: bool,
}

/// Write `config.json` with every tool path left blank.
///
/// # Errors
///
/// Returns an error if the file already exists and `force` is not set, or if
/// the directory cannot be created or written.
pub fn init(options: &InitOptions) -> Result<InitResult, InitError> {
  let project_dir = &options.project_dir;

  fs::create_dir_all(project_dir).map_err(|e| InitError::CreateDir {
    path: project_dir.clone(),
    source: e,
  })?;

  let config_path = project_dir.join(CONFIG_FILE);
  let overwritten = config_path.exists();

  if overwritten && !options.force {
    return Err(InitError::PathExists { path: config_path });
  }

  fs::write(&config_path, Config::default_json()).map_err(|e| InitError::WriteFile {
    path: config_path.clone(),
    source: e,
  })?;

  info!(path = %config_path.display(), overwritten, "wrote default config");

  Ok(InitResult {
    config_path,
    overwritten,
  })
}
