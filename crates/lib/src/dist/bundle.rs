//! Platform bundle assembly.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::consts::{ITCH_MANIFEST, STOCK_EXECUTABLES};
use crate::layout::ProjectLayout;

use super::{Bundle, Platform};

#[derive(Debug, Error)]
pub enum BundleError {
  #[error("missing {what}: {}", path.display())]
  MissingInput { what: &'static str, path: PathBuf },

  #[error("product name {0:?} collides with a runtime executable")]
  ReservedName(String),

  #[error("I/O error at {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> BundleError + '_ {
  move |source| BundleError::Io {
    path: path.to_path_buf(),
    source,
  }
}

async fn require(path: &Path, what: &'static str) -> Result<(), BundleError> {
  if fs::try_exists(path).await.map_err(io_err(path))? {
    Ok(())
  } else {
    Err(BundleError::MissingInput {
      what,
      path: path.to_path_buf(),
    })
  }
}

async fn copy(from: &Path, to: &Path) -> Result<(), BundleError> {
  if let Some(parent) = to.parent() {
    fs::create_dir_all(parent).await.map_err(io_err(parent))?;
  }
  fs::copy(from, to).await.map_err(io_err(to))?;
  debug!(from = %from.display(), to = %to.display(), "copied");
  Ok(())
}

/// Write `runtime` followed by `archive` to `dest`, byte for byte.
pub async fn fuse(runtime: &Path, archive: &Path, dest: &Path) -> Result<u64, BundleError> {
  let mut out = fs::File::create(dest).await.map_err(io_err(dest))?;
  let mut written = 0;

  for part in [runtime, archive] {
    let mut input = fs::File::open(part).await.map_err(io_err(part))?;
    written += tokio::io::copy(&mut input, &mut out).await.map_err(io_err(dest))?;
  }

  out.flush().await.map_err(io_err(dest))?;
  Ok(written)
}

/// Fuse the Windows runtime with the archive into `<product>.exe` and drop
/// the stock executables.
pub async fn bundle_windows(layout: &ProjectLayout, product: &str) -> Result<Bundle, BundleError> {
  let dir = layout.bundle_dir(Platform::Windows);
  let runtime = dir.join("love.exe");
  let archive = layout.archive_path(product);
  let exe = dir.join(format!("{}.exe", product));

  if STOCK_EXECUTABLES.iter().any(|stock| product.eq_ignore_ascii_case(stock)) {
    return Err(BundleError::ReservedName(product.to_string()));
  }

  require(&runtime, "runtime executable").await?;
  require(&archive, "archive").await?;

  let size = fuse(&runtime, &archive, &exe).await?;
  info!(path = %exe.display(), size, "fused executable written");

  for stock in STOCK_EXECUTABLES {
    let path = dir.join(format!("{}.exe", stock));
    match fs::remove_file(&path).await {
      Ok(()) => debug!(path = %path.display(), "removed stock executable"),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
      Err(e) => return Err(io_err(&path)(e)),
    }
  }

  Ok(Bundle {
    platform: Platform::Windows,
    dir,
    files: vec![exe],
    fused: true,
  })
}

/// Copy `dist/<platform>/.itch.toml` into the platform's bundle directory.
pub async fn copy_itch_manifest(layout: &ProjectLayout, platform: Platform) -> Result<PathBuf, BundleError> {
  let from = layout.template_dir(platform).join(ITCH_MANIFEST);
  let to = layout.bundle_dir(platform).join(ITCH_MANIFEST);

  require(&from, "push manifest template").await?;
  copy(&from, &to).await?;

  Ok(to)
}

/// Place the archive and the bundle metadata inside `<product>.app`.
pub async fn bundle_mac(layout: &ProjectLayout, product: &str) -> Result<Bundle, BundleError> {
  let dir = layout.bundle_dir(Platform::Mac);
  let app = dir.join(format!("{}.app", product));
  let archive = layout.archive_path(product);
  let plist = layout.template_dir(Platform::Mac).join("Info.plist");

  require(&app, "application bundle").await?;
  require(&archive, "archive").await?;
  require(&plist, "Info.plist template").await?;

  let packaged = app.join("Contents/Resources").join(format!("{}.love", product));
  copy(&archive, &packaged).await?;

  let info_plist = app.join("Contents/Info.plist");
  copy(&plist, &info_plist).await?;

  let manifest = copy_itch_manifest(layout, Platform::Mac).await?;

  info!(path = %app.display(), "mac bundle assembled");

  Ok(Bundle {
    platform: Platform::Mac,
    dir,
    files: vec![packaged, info_plist, manifest],
    fused: false,
  })
}

/// Copy the bare archive into `dist-linux/`.
pub async fn bundle_linux(layout: &ProjectLayout, product: &str) -> Result<Bundle, BundleError> {
  let dir = layout.bundle_dir(Platform::Linux);
  let archive = layout.archive_path(product);
  require(&archive, "archive").await?;

  let dest = dir.join(format!("{}.love", product));
  copy(&archive, &dest).await?;

  info!(path = %dest.display(), "linux bundle assembled");

  Ok(Bundle {
    platform: Platform::Linux,
    dir,
    files: vec![dest],
    fused: false,
  })
}
