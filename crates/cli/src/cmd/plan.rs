use anyhow::{Context, Result};

use vore_lib::pipeline;

use super::load_context;
use crate::output::print_waves;

/// Print the execution waves for `target` without running anything.
pub fn cmd_plan(project_dir: &std::path::Path, target: &str) -> Result<()> {
  let ctx = load_context(project_dir)?;
  let waves = pipeline::plan(&ctx, target).with_context(|| format!("Failed to plan {}", target))?;
  print_waves(&waves);
  Ok(())
}
