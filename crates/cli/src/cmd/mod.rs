mod build;
mod clean;
mod dist;
mod init;
mod pack;
mod plan;
mod publish;
mod run;
mod watch;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use dist::cmd_dist;
pub use init::cmd_init;
pub use pack::cmd_pack;
pub use plan::cmd_plan;
pub use publish::cmd_publish;
pub use run::cmd_run;
pub use watch::cmd_watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::debug;
use vore_lib::config::ProjectContext;
use vore_lib::graph::{GraphReport, TaskStatus};
use vore_lib::pipeline;

use crate::output::{format_duration, print_report, print_success};

/// Options shared by every command that runs pipeline tasks.
#[derive(Debug, Clone)]
pub struct RunOptions {
  pub project_dir: PathBuf,
  pub jobs: usize,
}

fn runtime() -> Result<tokio::runtime::Runtime> {
  tokio::runtime::Runtime::new().context("Failed to create async runtime")
}

fn project_root(dir: &Path) -> Result<PathBuf> {
  dunce::canonicalize(dir).with_context(|| format!("Project directory not found: {}", dir.display()))
}

fn load_context(dir: &Path) -> Result<Arc<ProjectContext>> {
  let root = project_root(dir)?;
  let ctx = ProjectContext::load(&root).with_context(|| format!("Failed to load project at {}", root.display()))?;
  Ok(Arc::new(ctx))
}

/// Run `targets`, print the per-task summary and fail if any task failed.
async fn run_and_report(ctx: &Arc<ProjectContext>, targets: &[String], jobs: usize) -> Result<GraphReport> {
  debug!(targets = ?targets, jobs, "running targets");
  let start = Instant::now();
  let report = pipeline::run_targets(ctx, targets.iter().map(String::as_str), jobs)
    .await
    .context("Failed to schedule tasks")?;

  print_report(&report);

  if let Some((id, err)) = report.first_failure() {
    bail!("{} failed: {}", id, err);
  }

  print_success(&format!(
    "{} finished {} task(s) in {}",
    targets.join(", "),
    report.count(TaskStatus::Succeeded),
    format_duration(start.elapsed())
  ));
  Ok(report)
}
