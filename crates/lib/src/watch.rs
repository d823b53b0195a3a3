//! Watch mode: debounced change notifications for source assets.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, DebouncedEventKind, Debouncer, new_debouncer};
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tracing::{debug, warn};

use crate::consts::{IGNORED_DIRS, WATCH_DEBOUNCE_MS, WATCHED_EXTENSIONS};

#[derive(Debug, Error)]
pub enum WatchError {
  #[error("failed to initialize file watcher: {0}")]
  Init(#[source] notify::Error),

  #[error("failed to watch {}: {source}", path.display())]
  WatchPath {
    path: PathBuf,
    #[source]
    source: notify::Error,
  },
}

/// True if a change to `path` should trigger a rebuild.
///
/// Only watched source extensions count, and nothing under an output or
/// hidden directory does.
pub fn is_relevant(root: &Path, path: &Path) -> bool {
  let Some(ext) = path.extension() else {
    return false;
  };
  let ext = ext.to_string_lossy().to_lowercase();
  if !WATCHED_EXTENSIONS.contains(&ext.as_str()) {
    return false;
  }

  let relative = path.strip_prefix(root).unwrap_or(path);
  let mut dirs = relative.components().rev().skip(1);
  !dirs.any(|c| {
    let name = c.as_os_str().to_string_lossy();
    name.starts_with('.') || name.starts_with("dist-") || IGNORED_DIRS.contains(&&*name)
  })
}

/// A running watcher over a project root.
pub struct ChangeStream {
  root: PathBuf,
  rx: UnboundedReceiver<DebounceEventResult>,
  _debouncer: Debouncer<RecommendedWatcher>,
}

impl ChangeStream {
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Wait for the next debounced batch containing relevant changes.
  ///
  /// Returns the changed paths, sorted, or `None` once the watcher stops.
  pub async fn next_batch(&mut self) -> Option<Vec<PathBuf>> {
    loop {
      match self.rx.recv().await? {
        Ok(events) => {
          let mut changed: Vec<PathBuf> = events
            .into_iter()
            .filter(|e| matches!(e.kind, DebouncedEventKind::Any) && is_relevant(&self.root, &e.path))
            .map(|e| e.path)
            .collect();
          if changed.is_empty() {
            continue;
          }
          changed.sort();
          changed.dedup();
          debug!(count = changed.len(), "relevant changes");
          return Some(changed);
        }
        Err(e) => warn!(error = ?e, "watch error; continuing"),
      }
    }
  }
}

/// Start watching `root` recursively.
pub fn watch(root: &Path) -> Result<ChangeStream, WatchError> {
  watch_with_debounce(root, Duration::from_millis(WATCH_DEBOUNCE_MS))
}

pub fn watch_with_debounce(root: &Path, debounce: Duration) -> Result<ChangeStream, WatchError> {
  let (tx, rx) = unbounded_channel();
  let mut debouncer = new_debouncer(debounce, move |result: DebounceEventResult| {
    // The receiver is gone once the stream is dropped.
    let _ = tx.send(result);
  })
  .map_err(WatchError::Init)?;

  debouncer
    .watcher()
    .watch(root, RecursiveMode::Recursive)
    .map_err(|source| WatchError::WatchPath {
      path: root.to_path_buf(),
      source,
    })?;

  Ok(ChangeStream {
    root: root.to_path_buf(),
    rx,
    _debouncer: debouncer,
  })
}
