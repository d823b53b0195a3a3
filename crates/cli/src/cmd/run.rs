use std::sync::Arc;

use anyhow::{Context, Result};

use vore_lib::config::ProjectContext;
use vore_lib::pipeline::{self, BUILD};

use super::{RunOptions, load_context, run_and_report, runtime};
use crate::output::print_info;

/// Build, then launch the runtime player on `build/`.
///
/// A player exiting non-zero makes the command fail.
pub fn cmd_run(options: &RunOptions) -> Result<()> {
  let ctx = load_context(&options.project_dir)?;
  let rt = runtime()?;
  rt.block_on(build_and_play(&ctx, options.jobs))
}

async fn build_and_play(ctx: &Arc<ProjectContext>, jobs: usize) -> Result<()> {
  run_and_report(ctx, &[BUILD.to_string()], jobs).await?;
  print_info("Launching game");
  pipeline::play(ctx).await.context("Game exited with an error")
}
