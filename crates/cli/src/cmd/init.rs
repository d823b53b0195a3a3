//! Implementation of the `vore init` command.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use vore_lib::config::Tool;
use vore_lib::init::{InitOptions, init};

use crate::output::symbols;

/// Write a default `config.json` into `project_dir`.
///
/// # Errors
///
/// Returns an error if the config already exists and `force` is not set.
pub fn cmd_init(project_dir: &Path, force: bool) -> Result<()> {
  let options = InitOptions {
    project_dir: project_dir.to_path_buf(),
    force,
  };

  let result = init(&options).context("Failed to initialize project")?;

  let headline = if result.overwritten {
    "Replaced tool configuration"
  } else {
    "Created tool configuration"
  };
  println!("{} {}", symbols::SUCCESS.green(), headline.green().bold());
  println!();
  println!("  {} Config: {}", symbols::INFO.cyan(), result.config_path.display());
  println!();
  println!("Fill in a path for each tool you use:");
  for tool in Tool::ALL {
    println!("  {} {}", symbols::ARROW.dimmed(), tool.as_str());
  }

  Ok(())
}
