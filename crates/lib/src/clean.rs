//! Removing generated output.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::ARCHIVE_EXTENSION;
use crate::dist::Platform;
use crate::layout::ProjectLayout;

#[derive(Debug, Error)]
#[error("failed to remove {}: {source}", path.display())]
pub struct CleanError {
  pub path: PathBuf,
  #[source]
  pub source: std::io::Error,
}

fn clean_err(path: &Path) -> impl FnOnce(std::io::Error) -> CleanError + '_ {
  move |source| CleanError {
    path: path.to_path_buf(),
    source,
  }
}

/// Delete `build/`, every `*.love` at the project root and all platform
/// staging directories. Templates under `dist/` are kept.
///
/// Returns the paths that were removed.
pub async fn clean(layout: &ProjectLayout) -> Result<Vec<PathBuf>, CleanError> {
  let mut targets = vec![layout.build_dir()];
  targets.extend(archives(layout.root()).await?);
  targets.extend(Platform::ALL.map(|p| layout.staging_dir(p)));

  let mut removed = Vec::new();
  for path in targets {
    let meta = match tokio::fs::symlink_metadata(&path).await {
      Ok(meta) => meta,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
      Err(e) => return Err(clean_err(&path)(e)),
    };

    if meta.is_dir() {
      tokio::fs::remove_dir_all(&path).await.map_err(clean_err(&path))?;
    } else {
      tokio::fs::remove_file(&path).await.map_err(clean_err(&path))?;
    }
    debug!(path = %path.display(), "removed");
    removed.push(path);
  }

  info!(removed = removed.len(), "clean complete");
  Ok(removed)
}

async fn archives(root: &Path) -> Result<Vec<PathBuf>, CleanError> {
  let mut found = Vec::new();
  let mut entries = match tokio::fs::read_dir(root).await {
    Ok(entries) => entries,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(found),
    Err(e) => return Err(clean_err(root)(e)),
  };

  while let Some(entry) = entries.next_entry().await.map_err(clean_err(root))? {
    let path = entry.path();
    if path.extension().is_some_and(|ext| ext == ARCHIVE_EXTENSION) {
      found.push(path);
    }
  }

  found.sort();
  Ok(found)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::write_file;
  use tempfile::TempDir;

  #[tokio::test]
  async fn removes_outputs_and_keeps_sources() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_file(root, "build/a.lua", b"");
    write_file(root, "hop.love", b"PK");
    write_file(root, "old.love", b"PK");
    write_file(root, "dist-win/love.zip", b"PK");
    write_file(root, "dist-linux/hop.love", b"PK");
    write_file(root, "dist/win/.itch.toml", b"");
    write_file(root, "src/a.moon", b"");
    write_file(root, "data/keep.love.txt", b"");

    let removed = clean(&ProjectLayout::new(root)).await.unwrap();

    assert_eq!(removed.len(), 5);
    assert!(!root.join("build").exists());
    assert!(!root.join("hop.love").exists());
    assert!(!root.join("dist-win").exists());
    assert!(root.join("dist/win/.itch.toml").exists());
    assert!(root.join("src/a.moon").exists());
    assert!(root.join("data/keep.love.txt").exists());
  }

  #[tokio::test]
  async fn clean_project_is_a_no_op() {
    let temp = TempDir::new().unwrap();

    let removed = clean(&ProjectLayout::new(temp.path())).await.unwrap();

    assert!(removed.is_empty());
  }
}
