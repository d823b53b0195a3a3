//! Asset transpilers.
//!
//! Each [`AssetPipeline`] is one batch: a glob over a base directory whose
//! matches are converted into `build/` by a single asset kind. A batch only
//! touches files whose outputs are missing or stale (see
//! [`crate::incremental`]) and stops at its first failure, leaving other
//! batches untouched.

mod convert;
mod discover;

use std::path::{Path, PathBuf};

use glob::Pattern;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Binaries;
use crate::incremental::needs_regeneration;
use crate::layout::ProjectLayout;
use crate::tool::ToolError;
use crate::util::compile_patterns;

pub use convert::{convert, outputs};
pub use discover::discover;

/// Errors produced by an asset batch.
#[derive(Debug, Error)]
pub enum TranspileError {
  #[error("failed to scan {}: {source}", path.display())]
  Discover {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("invalid pattern {pattern:?}: {source}")]
  Pattern {
    pattern: String,
    #[source]
    source: glob::PatternError,
  },

  #[error("I/O error at {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to convert {}: {source}", asset.display())]
  Tool {
    asset: PathBuf,
    #[source]
    source: ToolError,
  },

  #[error("asset scan task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

impl TranspileError {
  pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
    TranspileError::Io {
      path: path.to_path_buf(),
      source,
    }
  }

  pub(crate) fn tool(asset: &Path, source: ToolError) -> Self {
    TranspileError::Tool {
      asset: asset.to_path_buf(),
      source,
    }
  }
}

/// How a matched source becomes build output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
  /// Copied verbatim.
  Copy,
  /// Compiled to Lua by the script compiler.
  Script,
  /// Exported to a Lua table by the tilemap exporter.
  Tilemap,
  /// Exported to a sheet image plus frame data by the sprite exporter.
  Sprite,
}

/// One batch of assets.
#[derive(Debug, Clone)]
pub struct AssetPipeline {
  pub name: String,
  pub kind: AssetKind,
  /// Directory the pattern is matched against.
  pub base: PathBuf,
  pub pattern: String,
  pub excludes: Vec<String>,
  /// Root that relative source paths are mirrored under.
  pub dest: PathBuf,
}

/// Outcome of a successful batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
  pub name: String,
  pub regenerated: Vec<PathBuf>,
  pub up_to_date: usize,
}

impl AssetPipeline {
  pub fn new(name: impl Into<String>, kind: AssetKind, base: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
    let base = base.into();
    Self {
      name: name.into(),
      kind,
      dest: base.clone(),
      base,
      pattern: pattern.into(),
      excludes: Vec::new(),
    }
  }

  pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
    self.excludes.push(pattern.into());
    self
  }

  pub fn dest(mut self, dest: impl Into<PathBuf>) -> Self {
    self.dest = dest.into();
    self
  }

  /// The five batches every project builds, rooted at `layout`.
  pub fn standard(layout: &ProjectLayout) -> Vec<AssetPipeline> {
    let root = layout.root();
    let build = layout.build_dir();
    vec![
      AssetPipeline::new("build:lua", AssetKind::Copy, root.join("src"), "**/*.lua").dest(&build),
      AssetPipeline::new("build:moon", AssetKind::Script, root.join("src"), "**/*.moon").dest(&build),
      AssetPipeline::new("build:tiled", AssetKind::Tilemap, root, "**/*.tmx").dest(&build),
      AssetPipeline::new("build:aseprite", AssetKind::Sprite, root, "**/*.ase").dest(&build),
      AssetPipeline::new("build:other-assets", AssetKind::Copy, root.join("data"), "**/*")
        .exclude("**/*.tmx")
        .exclude("**/*.ase")
        .dest(build.join("data")),
    ]
  }

  /// Convert every stale source in this batch.
  ///
  /// # Errors
  ///
  /// Returns the first conversion failure; files converted before it stay
  /// in place and are skipped on the next run.
  pub async fn run(&self, binaries: &Binaries) -> Result<BatchReport, TranspileError> {
    let include = Pattern::new(&self.pattern).map_err(|source| TranspileError::Pattern {
      pattern: self.pattern.clone(),
      source,
    })?;
    let excludes = compile_patterns(&self.excludes).map_err(|source| TranspileError::Pattern {
      pattern: self.excludes.join(", "),
      source,
    })?;

    let base = self.base.clone();
    let sources = tokio::task::spawn_blocking(move || discover(&base, &include, &excludes))
      .await??;

    let mut report = BatchReport {
      name: self.name.clone(),
      ..Default::default()
    };

    for relative in sources {
      let source = self.base.join(&relative);
      let targets = outputs(self.kind, &relative, &self.dest);

      let stale = needs_regeneration(&source, &targets).map_err(|e| TranspileError::io(&source, e))?;
      if !stale {
        debug!(batch = %self.name, source = %relative.display(), "up to date");
        report.up_to_date += 1;
        continue;
      }

      convert(self.kind, &source, &targets, binaries).await?;
      report.regenerated.push(relative);
    }

    info!(
      batch = %self.name,
      regenerated = report.regenerated.len(),
      up_to_date = report.up_to_date,
      "batch complete"
    );

    Ok(report)
  }
}
