//! Implementation of the `vore publish` command.
//!
//! Runs the full distribution pipeline for the requested platforms and pushes
//! each bundle directory to its itch.io channel.

use anyhow::{Result, bail};

use vore_lib::dist::Platform;
use vore_lib::pipeline::publish_target;
use vore_lib::publish::destination;

use super::{RunOptions, load_context, run_and_report, runtime};
use crate::output::print_stat;

pub fn cmd_publish(options: &RunOptions, platform: Option<Platform>) -> Result<()> {
  let ctx = load_context(&options.project_dir)?;
  let Some(game) = ctx.package.publish_game() else {
    bail!("No publish destination: set vore.butler.game in package.json");
  };
  let game = game.to_string();

  let rt = runtime()?;
  rt.block_on(run_and_report(&ctx, &[publish_target(platform)], options.jobs))?;

  let platforms = match platform {
    Some(p) => vec![p],
    None => Platform::ALL.to_vec(),
  };
  for p in platforms {
    print_stat(p.tag(), &destination(&game, p));
  }
  Ok(())
}
