//! Incremental rebuild detection.
//!
//! A derived file is regenerated when it is missing or older than its
//! source. There is no cache beyond the filesystem's own timestamps, so
//! deleting the build tree (`vore clean`) forces a full rebuild.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A source file and the artifacts derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
  pub source: PathBuf,
  pub destinations: Vec<PathBuf>,
}

impl FileRecord {
  pub fn new(source: impl Into<PathBuf>, destinations: Vec<PathBuf>) -> Self {
    Self {
      source: source.into(),
      destinations,
    }
  }

  pub fn needs_regeneration(&self) -> io::Result<bool> {
    needs_regeneration(&self.source, &self.destinations)
  }
}

/// Returns true if any destination is absent or older than `source`.
///
/// # Errors
///
/// Fails if the source cannot be read; an unreadable destination counts as
/// absent.
pub fn needs_regeneration(source: &Path, destinations: &[PathBuf]) -> io::Result<bool> {
  let source_mtime = modified(source)?;

  for dest in destinations {
    match modified(dest) {
      Ok(dest_mtime) if dest_mtime >= source_mtime => {}
      _ => return Ok(true),
    }
  }

  Ok(destinations.is_empty())
}

fn modified(path: &Path) -> io::Result<SystemTime> {
  std::fs::metadata(path)?.modified()
}

/// Replace the extension of `path` (`a/b.moon` -> `a/b.lua`).
pub fn remap_extension(path: &Path, extension: &str) -> PathBuf {
  path.with_extension(extension)
}

/// Append `suffix` to the file stem and replace the extension
/// (`maps/b.tmx` -> `maps/b_tmx.lua`).
pub fn remap_with_suffix(path: &Path, suffix: &str, extension: &str) -> PathBuf {
  let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
  path.with_file_name(format!("{}{}.{}", stem, suffix, extension))
}

/// Append an extension after the existing one (`c.ase` -> `c.ase.png`).
pub fn append_extension(path: &Path, extension: &str) -> PathBuf {
  let name = path.file_name().map(|s| s.to_string_lossy()).unwrap_or_default();
  path.with_file_name(format!("{}.{}", name, extension))
}
