//! Implementation of the `vore watch` command.
//!
//! Builds once, then rebuilds whenever a watched source file changes. A failed
//! rebuild is reported and watching continues; Ctrl-C stops the loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use vore_lib::config::ProjectContext;
use vore_lib::pipeline::BUILD;
use vore_lib::watch::watch;

use super::{RunOptions, load_context, run_and_report, runtime};
use crate::output::{print_error, print_info, symbols};

pub fn cmd_watch(options: &RunOptions) -> Result<()> {
  let ctx = load_context(&options.project_dir)?;
  let rt = runtime()?;
  rt.block_on(watch_loop(&ctx, options.jobs))
}

async fn rebuild(ctx: &Arc<ProjectContext>, jobs: usize) {
  if let Err(e) = run_and_report(ctx, &[BUILD.to_string()], jobs).await {
    print_error(&format!("{:#}", e));
  }
}

async fn watch_loop(ctx: &Arc<ProjectContext>, jobs: usize) -> Result<()> {
  rebuild(ctx, jobs).await;

  let mut changes = watch(ctx.layout.root()).context("Failed to start watching")?;
  print_info(&format!("Watching {} for changes", ctx.layout.root().display()));

  loop {
    let batch = tokio::select! {
      batch = changes.next_batch() => batch,
      _ = tokio::signal::ctrl_c() => {
        println!();
        print_info("Stopped watching");
        return Ok(());
      }
    };
    let Some(paths) = batch else {
      return Ok(());
    };

    for path in &paths {
      let shown = path.strip_prefix(changes.root()).unwrap_or(path);
      println!("{} {}", symbols::ARROW.cyan(), shown.display());
    }
    rebuild(ctx, jobs).await;
  }
}
