use anyhow::Result;

use vore_lib::pipeline::BUILD;

use super::{RunOptions, load_context, run_and_report, runtime};

/// Transpile every source asset into `build/`.
pub fn cmd_build(options: &RunOptions) -> Result<()> {
  let ctx = load_context(&options.project_dir)?;
  let rt = runtime()?;
  rt.block_on(run_and_report(&ctx, &[BUILD.to_string()], options.jobs))?;
  Ok(())
}
