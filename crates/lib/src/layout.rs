//! On-disk layout of a vore project.
//!
//! Every path the pipeline reads or writes is derived here from the project
//! root, so tasks never build paths by hand.

use std::path::{Path, PathBuf};

use crate::consts::{ARCHIVE_EXTENSION, BUILD_DIR, DIST_TEMPLATE_DIR, RUNTIME_CACHE_FILE, RUNTIME_DIR};
use crate::dist::Platform;

#[derive(Debug, Clone)]
pub struct ProjectLayout {
  root: PathBuf,
}

impl ProjectLayout {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// `build/`, the transpiled asset tree.
  pub fn build_dir(&self) -> PathBuf {
    self.root.join(BUILD_DIR)
  }

  /// `<product>.love` at the project root.
  pub fn archive_path(&self, product: &str) -> PathBuf {
    self.root.join(format!("{}.{}", product, ARCHIVE_EXTENSION))
  }

  /// `dist-<platform>/`, the staging and output directory for a platform.
  pub fn staging_dir(&self, platform: Platform) -> PathBuf {
    self.root.join(format!("dist-{}", platform.tag()))
  }

  /// Cached runtime download for a platform.
  pub fn runtime_cache(&self, platform: Platform) -> PathBuf {
    self.staging_dir(platform).join(RUNTIME_CACHE_FILE)
  }

  /// Directory handed to the push tool for a platform.
  pub fn bundle_dir(&self, platform: Platform) -> PathBuf {
    match platform {
      Platform::Windows | Platform::Mac => self.staging_dir(platform).join(RUNTIME_DIR),
      Platform::Linux => self.staging_dir(platform),
    }
  }

  /// `dist/<platform>/`, the source of platform manifest files.
  pub fn template_dir(&self, platform: Platform) -> PathBuf {
    self.root.join(DIST_TEMPLATE_DIR).join(platform.tag())
  }
}
