use anyhow::Result;

use vore_lib::dist::Platform;
use vore_lib::pipeline::dist_target;

use super::{RunOptions, load_context, run_and_report, runtime};
use crate::output::print_stat;

/// Produce the distributable for one platform, or all of them.
pub fn cmd_dist(options: &RunOptions, platform: Option<Platform>) -> Result<()> {
  let ctx = load_context(&options.project_dir)?;
  let rt = runtime()?;
  rt.block_on(run_and_report(&ctx, &[dist_target(platform)], options.jobs))?;

  let platforms = match platform {
    Some(p) => vec![p],
    None => Platform::ALL.to_vec(),
  };
  for p in platforms {
    print_stat(p.tag(), &ctx.layout.bundle_dir(p).display().to_string());
  }
  Ok(())
}
