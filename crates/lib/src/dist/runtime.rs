//! Runtime download and extraction.
//!
//! The runtime zip is cached at `dist-<platform>/love.zip`; once present it
//! is never downloaded again. Extraction always starts from a clean
//! normalized directory and renames the zip's top-level directory into
//! place once unpacking has finished.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::config::RuntimeUrls;
use crate::consts::{APP_NAME, RUNTIME_CACHE_FILE, RUNTIME_DIR};

use super::Platform;

pub const WINDOWS_RUNTIME_URL: &str = "https://bitbucket.org/rude/love/downloads/love-0.10.2-win32.zip";
pub const MAC_RUNTIME_URL: &str = "https://bitbucket.org/rude/love/downloads/love-0.10.2-macosx-x64.zip";

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("failed to download {url}: {source}")]
  Request {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("failed to download {url}: HTTP {status}")]
  Status { url: String, status: reqwest::StatusCode },

  #[error("I/O error at {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to read runtime archive {}: {source}", path.display())]
  Archive {
    path: PathBuf,
    #[source]
    source: zip::result::ZipError,
  },

  #[error("runtime archive {} has an unsafe entry: {name}", path.display())]
  UnsafeEntry { path: PathBuf, name: String },

  #[error("runtime archive {} did not contain {expected}/", path.display())]
  MissingTopDir { path: PathBuf, expected: String },

  #[error("extraction task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> FetchError + '_ {
  move |source| FetchError::Io {
    path: path.to_path_buf(),
    source,
  }
}

/// Where a platform's runtime comes from and where it ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSource {
  pub platform: Platform,
  pub url: String,
  /// Top-level directory inside the zip.
  pub top_dir: String,
  /// Final location of `top_dir`, relative to the staging directory.
  pub install_path: PathBuf,
}

impl RuntimeSource {
  /// The runtime for `platform`, or `None` if the platform ships the bare
  /// archive.
  pub fn for_platform(platform: Platform, product: &str, overrides: &RuntimeUrls) -> Option<Self> {
    let (default_url, top_dir, install_path) = match platform {
      Platform::Windows => (WINDOWS_RUNTIME_URL, "love-0.10.2-win32", PathBuf::from(RUNTIME_DIR)),
      Platform::Mac => (
        MAC_RUNTIME_URL,
        "love.app",
        Path::new(RUNTIME_DIR).join(format!("{}.app", product)),
      ),
      Platform::Linux => return None,
    };

    Some(Self {
      platform,
      url: overrides.get(platform).unwrap_or(default_url).to_string(),
      top_dir: top_dir.to_string(),
      install_path,
    })
  }
}

/// Download the runtime zip into `staging` unless it is already cached.
///
/// Returns `true` if a download happened.
pub async fn download(source: &RuntimeSource, staging: &Path) -> Result<bool, FetchError> {
  let cache = staging.join(RUNTIME_CACHE_FILE);
  if tokio::fs::try_exists(&cache).await.map_err(io_err(&cache))? {
    info!(platform = %source.platform, path = %cache.display(), "runtime cached; skipping download");
    return Ok(false);
  }

  tokio::fs::create_dir_all(staging).await.map_err(io_err(staging))?;

  info!(platform = %source.platform, url = %source.url, "downloading runtime");
  let request_err = |e: reqwest::Error| FetchError::Request {
    url: source.url.clone(),
    source: e,
  };
  let client = reqwest::Client::builder()
    .user_agent(format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION")))
    .build()
    .map_err(request_err)?;
  let mut response = client.get(&source.url).send().await.map_err(request_err)?;

  if !response.status().is_success() {
    return Err(FetchError::Status {
      url: source.url.clone(),
      status: response.status(),
    });
  }

  // A partial download must never look like a cache hit.
  let partial = staging.join(format!("{}.part", RUNTIME_CACHE_FILE));
  let mut file = tokio::fs::File::create(&partial).await.map_err(io_err(&partial))?;
  let mut size = 0u64;
  while let Some(chunk) = response.chunk().await.map_err(request_err)? {
    file.write_all(&chunk).await.map_err(io_err(&partial))?;
    size += chunk.len() as u64;
  }
  file.flush().await.map_err(io_err(&partial))?;
  drop(file);
  tokio::fs::rename(&partial, &cache).await.map_err(io_err(&cache))?;

  info!(path = %cache.display(), size, "download complete");
  Ok(true)
}

/// Extract the cached runtime zip and move it to its install path.
///
/// Returns the installed runtime directory.
pub async fn extract(source: &RuntimeSource, staging: &Path) -> Result<PathBuf, FetchError> {
  let cache = staging.join(RUNTIME_CACHE_FILE);
  let normalized = staging.join(RUNTIME_DIR);
  let unpacked = staging.join(&source.top_dir);
  let target = staging.join(&source.install_path);

  for stale in [&normalized, &unpacked] {
    if tokio::fs::try_exists(stale).await.map_err(io_err(stale))? {
      debug!(path = %stale.display(), "removing stale runtime directory");
      tokio::fs::remove_dir_all(stale).await.map_err(io_err(stale))?;
    }
  }

  let (archive, dest) = (cache.clone(), staging.to_path_buf());
  tokio::task::spawn_blocking(move || unpack_zip(&archive, &dest)).await??;

  if !tokio::fs::try_exists(&unpacked).await.map_err(io_err(&unpacked))? {
    return Err(FetchError::MissingTopDir {
      path: cache,
      expected: source.top_dir.clone(),
    });
  }

  if let Some(parent) = target.parent() {
    tokio::fs::create_dir_all(parent).await.map_err(io_err(parent))?;
  }
  tokio::fs::rename(&unpacked, &target).await.map_err(io_err(&target))?;

  info!(platform = %source.platform, path = %target.display(), "runtime extracted");
  Ok(target)
}

/// Download (if needed) and extract in one step.
pub async fn fetch(source: &RuntimeSource, staging: &Path) -> Result<PathBuf, FetchError> {
  download(source, staging).await?;
  extract(source, staging).await
}

fn unpack_zip(archive_path: &Path, dest: &Path) -> Result<(), FetchError> {
  let archive_err = |source| FetchError::Archive {
    path: archive_path.to_path_buf(),
    source,
  };

  let file = File::open(archive_path).map_err(io_err(archive_path))?;
  let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(archive_err)?;

  for i in 0..archive.len() {
    let mut entry = archive.by_index(i).map_err(archive_err)?;

    let relative = entry.enclosed_name().ok_or_else(|| FetchError::UnsafeEntry {
      path: archive_path.to_path_buf(),
      name: entry.name().to_string(),
    })?;
    let dest_path = dest.join(relative);

    if entry.is_dir() {
      fs::create_dir_all(&dest_path).map_err(io_err(&dest_path))?;
      continue;
    }

    if let Some(parent) = dest_path.parent() {
      fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    // App bundles ship framework symlinks.
    #[cfg(unix)]
    {
      use std::io::Read;

      if entry.is_symlink() {
        let mut link = String::new();
        entry.read_to_string(&mut link).map_err(io_err(&dest_path))?;
        std::os::unix::fs::symlink(&link, &dest_path).map_err(io_err(&dest_path))?;
        continue;
      }
    }

    let mut outfile = File::create(&dest_path).map_err(io_err(&dest_path))?;
    std::io::copy(&mut entry, &mut outfile).map_err(io_err(&dest_path))?;

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      if let Some(mode) = entry.unix_mode() {
        fs::set_permissions(&dest_path, fs::Permissions::from_mode(mode & 0o7777)).map_err(io_err(&dest_path))?;
      }
    }
  }

  Ok(())
}
