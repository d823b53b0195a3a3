//! Packaging `build/` into the `<product>.love` archive.
//!
//! The archive is rebuilt from scratch on every run. Entries are written in
//! sorted order with a fixed timestamp and fixed permissions, so the same
//! tree always produces the same bytes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::util::{compile_patterns, matches_any, slash_path};

#[derive(Debug, Error)]
pub enum PackError {
  #[error("invalid exclude pattern: {source}")]
  Pattern {
    #[source]
    source: glob::PatternError,
  },

  #[error("failed to scan {}: {source}", path.display())]
  Walk {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("I/O error at {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to write archive {}: {source}", path.display())]
  Zip {
    path: PathBuf,
    #[source]
    source: zip::result::ZipError,
  },

  #[error("packaging task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

/// A written archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
  pub path: PathBuf,
  /// Entry names, `/`-separated, in archive order.
  pub entries: Vec<String>,
}

/// Zip every file under `build_root` not matching `excludes` into
/// `archive_path`, replacing it.
pub async fn pack(build_root: &Path, archive_path: &Path, excludes: &[String]) -> Result<Archive, PackError> {
  let build_root = build_root.to_path_buf();
  let archive_path = archive_path.to_path_buf();
  let excludes = excludes.to_vec();
  tokio::task::spawn_blocking(move || pack_blocking(&build_root, &archive_path, &excludes)).await?
}

fn pack_blocking(build_root: &Path, archive_path: &Path, excludes: &[String]) -> Result<Archive, PackError> {
  let excludes = compile_patterns(excludes).map_err(|source| PackError::Pattern { source })?;
  let files = collect(build_root, &excludes)?;

  let parent = archive_path.parent().unwrap_or_else(|| Path::new("."));
  let io_err = |path: &Path| {
    let path = path.to_path_buf();
    move |source| PackError::Io { path, source }
  };
  let zip_err = |source| PackError::Zip {
    path: archive_path.to_path_buf(),
    source,
  };

  let temp = NamedTempFile::new_in(parent).map_err(io_err(parent))?;
  let mut writer = ZipWriter::new(BufWriter::new(temp));
  let options = SimpleFileOptions::default()
    .compression_method(CompressionMethod::Deflated)
    .last_modified_time(DateTime::default())
    .unix_permissions(0o644);

  let mut entries = Vec::with_capacity(files.len());
  for (path, name) in files {
    writer.start_file(name.as_str(), options).map_err(zip_err)?;
    let mut input = File::open(&path).map_err(io_err(&path))?;
    std::io::copy(&mut input, &mut writer).map_err(io_err(&path))?;
    debug!(entry = %name, "packed");
    entries.push(name);
  }

  let mut buffered = writer.finish().map_err(zip_err)?;
  buffered.flush().map_err(io_err(archive_path))?;
  let temp = buffered.into_inner().map_err(|e| io_err(archive_path)(e.into_error()))?;
  temp.persist(archive_path).map_err(|e| io_err(archive_path)(e.error))?;

  info!(path = %archive_path.display(), entries = entries.len(), "archive written");

  Ok(Archive {
    path: archive_path.to_path_buf(),
    entries,
  })
}

/// Files to pack as (absolute path, entry name), sorted by entry name.
fn collect(build_root: &Path, excludes: &[glob::Pattern]) -> Result<Vec<(PathBuf, String)>, PackError> {
  if !build_root.is_dir() {
    warn!(path = %build_root.display(), "nothing built; writing an empty archive");
    return Ok(Vec::new());
  }

  let mut files = Vec::new();
  for entry in WalkDir::new(build_root).sort_by_file_name() {
    let entry = entry.map_err(|source| PackError::Walk {
      path: build_root.to_path_buf(),
      source,
    })?;
    if !entry.file_type().is_file() {
      continue;
    }
    let Ok(relative) = entry.path().strip_prefix(build_root) else {
      continue;
    };

    let name = slash_path(relative);
    if matches_any(excludes, &name) {
      debug!(entry = %name, "excluded from archive");
      continue;
    }
    files.push((entry.into_path(), name));
  }

  files.sort_by(|a, b| a.1.cmp(&b.1));
  Ok(files)
}
