//! Pushing bundles with the external push tool.

use thiserror::Error;
use tracing::info;

use crate::config::{ProjectContext, Tool};
use crate::dist::Platform;
use crate::tool::{self, ToolError, ToolInvocation};

#[derive(Debug, Error)]
pub enum PublishError {
  #[error("no publish destination; set vore.butler.game in package.json")]
  MissingGame,

  #[error(transparent)]
  Tool(#[from] ToolError),
}

/// `<game>:<channel>` for `platform`.
pub fn destination(game: &str, platform: Platform) -> String {
  format!("{}:{}", game, platform.channel())
}

/// Push the bundle directory for `platform`.
pub async fn publish(ctx: &ProjectContext, platform: Platform) -> Result<(), PublishError> {
  let game = ctx.package.publish_game().ok_or(PublishError::MissingGame)?;
  let dir = ctx.layout.bundle_dir(platform);
  let target = destination(game, platform);

  let invocation = ToolInvocation::configured(&ctx.config.binaries, Tool::PushTool)?
    .arg("push")
    .arg(&dir)
    .arg(&target)
    .current_dir(ctx.layout.root());

  tool::invoke_streaming(&invocation).await?;

  info!(platform = %platform, destination = %target, "published");
  Ok(())
}
