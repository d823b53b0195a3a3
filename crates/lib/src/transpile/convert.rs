//! Per-kind output naming and conversion.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{Binaries, Tool};
use crate::incremental::{append_extension, remap_extension, remap_with_suffix};
use crate::tool::{self, ToolInvocation};

use super::{AssetKind, TranspileError};

/// Artifacts produced from `relative` (a path relative to the batch base),
/// rooted at `dest_root`.
pub fn outputs(kind: AssetKind, relative: &Path, dest_root: &Path) -> Vec<PathBuf> {
  match kind {
    AssetKind::Copy => vec![dest_root.join(relative)],
    AssetKind::Script => vec![dest_root.join(remap_extension(relative, "lua"))],
    AssetKind::Tilemap => vec![dest_root.join(remap_with_suffix(relative, "_tmx", "lua"))],
    AssetKind::Sprite => vec![
      dest_root.join(append_extension(relative, "png")),
      dest_root.join(append_extension(relative, "json")),
    ],
  }
}

/// Produce `outputs` from `source`.
///
/// `outputs` must be the list returned by [`outputs`] for the same kind.
pub async fn convert(
  kind: AssetKind,
  source: &Path,
  outputs: &[PathBuf],
  binaries: &Binaries,
) -> Result<(), TranspileError> {
  debug!(kind = ?kind, source = %source.display(), "converting asset");

  for output in outputs {
    create_parent(output).await?;
  }

  match kind {
    AssetKind::Copy => {
      let dest = &outputs[0];
      tokio::fs::copy(source, dest)
        .await
        .map_err(|e| TranspileError::io(dest, e))?;
    }

    AssetKind::Script => {
      let dest = &outputs[0];
      let invocation = ToolInvocation::configured(binaries, Tool::ScriptCompiler)
        .map_err(|e| TranspileError::tool(source, e))?
        .arg("-p")
        .arg(source);
      let output = tool::invoke(&invocation)
        .await
        .map_err(|e| TranspileError::tool(source, e))?;
      tokio::fs::write(dest, &output.stdout)
        .await
        .map_err(|e| TranspileError::io(dest, e))?;
    }

    AssetKind::Tilemap => {
      let invocation = ToolInvocation::configured(binaries, Tool::TilemapExporter)
        .map_err(|e| TranspileError::tool(source, e))?
        .arg("--export-map")
        .arg(source)
        .arg(&outputs[0]);
      tool::invoke(&invocation)
        .await
        .map_err(|e| TranspileError::tool(source, e))?;
    }

    AssetKind::Sprite => {
      let invocation = ToolInvocation::configured(binaries, Tool::SpriteExporter)
        .map_err(|e| TranspileError::tool(source, e))?
        .args(["-b", "--list-tags", "--format", "json-array"])
        .arg(source)
        .arg("--sheet")
        .arg(&outputs[0])
        .arg("--data")
        .arg(&outputs[1]);
      tool::invoke(&invocation)
        .await
        .map_err(|e| TranspileError::tool(source, e))?;
    }
  }

  Ok(())
}

async fn create_parent(path: &Path) -> Result<(), TranspileError> {
  if let Some(parent) = path.parent() {
    tokio::fs::create_dir_all(parent)
      .await
      .map_err(|e| TranspileError::io(parent, e))?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn output_naming_per_kind() {
    let root = Path::new("/game/build");

    assert_eq!(
      outputs(AssetKind::Copy, Path::new("ui/menu.lua"), root),
      vec![PathBuf::from("/game/build/ui/menu.lua")]
    );
    assert_eq!(
      outputs(AssetKind::Script, Path::new("a.moon"), root),
      vec![PathBuf::from("/game/build/a.lua")]
    );
    assert_eq!(
      outputs(AssetKind::Tilemap, Path::new("data/b.tmx"), root),
      vec![PathBuf::from("/game/build/data/b_tmx.lua")]
    );
    assert_eq!(
      outputs(AssetKind::Sprite, Path::new("c.ase"), root),
      vec![
        PathBuf::from("/game/build/c.ase.png"),
        PathBuf::from("/game/build/c.ase.json")
      ]
    );
  }

  #[tokio::test]
  async fn unconfigured_tool_fails_at_invocation() {
    let temp = tempfile::TempDir::new().unwrap();
    let source = temp.path().join("a.moon");
    std::fs::write(&source, "x = 1").unwrap();
    let outs = outputs(AssetKind::Script, Path::new("a.moon"), &temp.path().join("build"));

    let err = convert(AssetKind::Script, &source, &outs, &Binaries::default())
      .await
      .unwrap_err();

    assert!(matches!(err, TranspileError::Tool { .. }));
    assert!(!outs[0].exists());
  }
}
