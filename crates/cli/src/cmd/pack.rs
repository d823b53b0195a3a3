use anyhow::{Context, Result};

use vore_lib::pipeline::PACK;

use super::{RunOptions, load_context, run_and_report, runtime};
use crate::output::{format_bytes, print_stat};

/// Build, then package `build/` into the game archive.
pub fn cmd_pack(options: &RunOptions) -> Result<()> {
  let ctx = load_context(&options.project_dir)?;
  let rt = runtime()?;
  rt.block_on(run_and_report(&ctx, &[PACK.to_string()], options.jobs))?;

  let archive = ctx.archive_path();
  let size = std::fs::metadata(&archive)
    .with_context(|| format!("Archive missing after packing: {}", archive.display()))?
    .len();
  print_stat("Archive", &archive.display().to_string());
  print_stat("Size", &format_bytes(size));
  Ok(())
}
