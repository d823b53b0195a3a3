//! Source discovery for asset batches.

use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

use crate::consts::IGNORED_DIRS;
use crate::util::{matches_any, slash_path};

use super::TranspileError;

/// Find files under `base` matching `include` and none of `exclude`.
///
/// Returns paths relative to `base`, sorted. A missing `base` yields no
/// files. Hidden files are skipped, and output and VCS directories are never
/// descended into.
pub fn discover(base: &Path, include: &Pattern, exclude: &[Pattern]) -> Result<Vec<PathBuf>, TranspileError> {
  if !base.is_dir() {
    return Ok(Vec::new());
  }

  let mut found = Vec::new();
  let walker = WalkDir::new(base)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|e| e.depth() == 0 || !is_ignored_dir(e));

  for entry in walker {
    let entry = entry.map_err(|source| TranspileError::Discover {
      path: base.to_path_buf(),
      source,
    })?;

    if !entry.file_type().is_file() || entry.file_name().to_string_lossy().starts_with('.') {
      continue;
    }

    let Ok(relative) = entry.path().strip_prefix(base) else {
      continue;
    };
    let relative_str = slash_path(relative);

    if include.matches_with(&relative_str, crate::util::MATCH_OPTIONS) && !matches_any(exclude, &relative_str) {
      found.push(relative.to_path_buf());
    }
  }

  Ok(found)
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
  if !entry.file_type().is_dir() {
    return false;
  }
  let name = entry.file_name().to_string_lossy();
  name.starts_with('.') || name.starts_with("dist-") || IGNORED_DIRS.contains(&&*name)
}
