//! The standard task declarations of a vore project.
//!
//! Task names are stable and user visible: they are what `vore plan` prints
//! and what failures are reported against.

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use crate::config::{ProjectContext, Tool};
use crate::dist::{self, Platform, RuntimeSource};
use crate::graph::{GraphError, GraphReport, Task, TaskError, TaskGraph, TaskId};
use crate::pack;
use crate::publish;
use crate::tool::{self, ToolError, ToolInvocation};
use crate::transpile::AssetPipeline;

pub const BUILD: &str = "build";
pub const PACK: &str = "dist:zip";
pub const DIST: &str = "dist";
pub const PUBLISH: &str = "publish";

/// `dist:<platform>`, or `dist` for every platform.
pub fn dist_target(platform: Option<Platform>) -> String {
  match platform {
    Some(p) => format!("{}:{}", DIST, p.tag()),
    None => DIST.to_string(),
  }
}

/// `publish:<platform>`, or `publish` for every platform.
pub fn publish_target(platform: Option<Platform>) -> String {
  match platform {
    Some(p) => format!("{}:{}", PUBLISH, p.tag()),
    None => PUBLISH.to_string(),
  }
}

fn task<F, Fut>(ctx: &Arc<ProjectContext>, id: impl Into<TaskId>, action: F) -> Task
where
  F: FnOnce(Arc<ProjectContext>) -> Fut + Send + 'static,
  Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
  let ctx = Arc::clone(ctx);
  Task::new(id, move || action(ctx))
}

/// Declare every standard task.
pub fn standard_graph(ctx: &Arc<ProjectContext>) -> Result<TaskGraph, GraphError> {
  let mut graph = TaskGraph::new();

  let batches = AssetPipeline::standard(&ctx.layout);
  let batch_names: Vec<String> = batches.iter().map(|b| b.name.clone()).collect();
  for batch in batches {
    let name = batch.name.clone();
    graph.add(task(ctx, name, move |ctx| async move {
      batch.run(&ctx.config.binaries).await?;
      Ok(())
    }))?;
  }
  graph.add(Task::noop(BUILD).after(batch_names))?;

  graph.add(
    task(ctx, PACK, |ctx| async move {
      let archive = pack::pack(&ctx.layout.build_dir(), &ctx.archive_path(), &ctx.package.pack_excludes()).await?;
      info!(path = %archive.path.display(), entries = archive.entries.len(), "packaged");
      Ok(())
    })
    .after([BUILD]),
  )?;

  for platform in [Platform::Windows, Platform::Mac] {
    add_runtime_tasks(&mut graph, ctx, platform)?;
  }

  graph.add(
    task(ctx, "dist:win:fused", |ctx| async move {
      dist::bundle_windows(&ctx.layout, &ctx.package.name).await?;
      Ok(())
    })
    .after([PACK, "dist:win:extract-love"]),
  )?;
  graph.add(
    task(ctx, "dist:win:itch-toml", |ctx| async move {
      dist::copy_itch_manifest(&ctx.layout, Platform::Windows).await?;
      Ok(())
    })
    .after(["dist:win:fused"]),
  )?;
  graph.add(Task::noop("dist:win").after(["dist:win:itch-toml"]))?;

  graph.add(
    task(ctx, "dist:mac:fused", |ctx| async move {
      dist::bundle_mac(&ctx.layout, &ctx.package.name).await?;
      Ok(())
    })
    .after(["dist:mac:extract-love", PACK]),
  )?;
  graph.add(Task::noop("dist:mac").after(["dist:mac:fused"]))?;

  graph.add(
    task(ctx, "dist:linux", |ctx| async move {
      dist::bundle_linux(&ctx.layout, &ctx.package.name).await?;
      Ok(())
    })
    .after([PACK]),
  )?;

  graph.add(Task::noop(DIST).after(Platform::ALL.map(|p| dist_target(Some(p)))))?;

  for platform in Platform::ALL {
    graph.add(
      task(ctx, publish_target(Some(platform)), move |ctx| async move {
        publish::publish(&ctx, platform).await?;
        Ok(())
      })
      .after([dist_target(Some(platform))]),
    )?;
  }
  graph.add(Task::noop(PUBLISH).after(Platform::ALL.map(|p| publish_target(Some(p)))))?;

  Ok(graph)
}

fn add_runtime_tasks(graph: &mut TaskGraph, ctx: &Arc<ProjectContext>, platform: Platform) -> Result<(), GraphError> {
  let Some(source) = RuntimeSource::for_platform(platform, &ctx.package.name, &ctx.config.runtime_urls) else {
    return Ok(());
  };
  let download_id = format!("dist:{}:download-love", platform.tag());
  let extract_id = format!("dist:{}:extract-love", platform.tag());

  let download_source = source.clone();
  graph.add(task(ctx, download_id.as_str(), move |ctx| async move {
    dist::runtime::download(&download_source, &ctx.layout.staging_dir(platform)).await?;
    Ok(())
  }))?;

  graph.add(
    task(ctx, extract_id.as_str(), move |ctx| async move {
      dist::runtime::extract(&source, &ctx.layout.staging_dir(platform)).await?;
      Ok(())
    })
    .after([download_id]),
  )?;

  Ok(())
}

/// Execute `targets` and their dependencies.
pub async fn run_targets<I, S>(ctx: &Arc<ProjectContext>, targets: I, jobs: usize) -> Result<GraphReport, GraphError>
where
  I: IntoIterator<Item = S>,
  S: Into<TaskId>,
{
  standard_graph(ctx)?.select(targets)?.execute(jobs).await
}

/// Execution waves for `target` without running anything.
pub fn plan(ctx: &Arc<ProjectContext>, target: &str) -> Result<Vec<Vec<TaskId>>, GraphError> {
  standard_graph(ctx)?.select([target])?.execution_waves()
}

/// Launch the runtime player on the build tree.
///
/// Output is forwarded as it arrives; a non-zero exit is an error.
pub async fn play(ctx: &ProjectContext) -> Result<(), ToolError> {
  let invocation = ToolInvocation::configured(&ctx.config.binaries, Tool::RuntimePlayer)?
    .arg(crate::consts::BUILD_DIR)
    .current_dir(ctx.layout.root());
  tool::invoke_streaming(&invocation).await?;
  Ok(())
}
