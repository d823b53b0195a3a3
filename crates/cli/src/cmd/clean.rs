use std::path::Path;

use anyhow::{Context, Result};

use vore_lib::clean::clean;
use vore_lib::layout::ProjectLayout;

use super::{project_root, runtime};
use crate::output::{print_info, print_success};

/// Remove every generated artifact. Needs no project metadata.
pub fn cmd_clean(project_dir: &Path) -> Result<()> {
  let layout = ProjectLayout::new(project_root(project_dir)?);
  let rt = runtime()?;
  let removed = rt.block_on(clean(&layout)).context("Clean failed")?;

  if removed.is_empty() {
    print_info("Nothing to clean");
    return Ok(());
  }
  for path in &removed {
    let shown = path.strip_prefix(layout.root()).unwrap_or(path);
    print_success(&format!("Removed {}", shown.display()));
  }
  Ok(())
}
