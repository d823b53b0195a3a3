//! Platform distribution: runtime download and bundle assembly.

mod bundle;
pub mod runtime;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub use bundle::{BundleError, bundle_linux, bundle_mac, bundle_windows, copy_itch_manifest, fuse};
pub use runtime::{FetchError, RuntimeSource};

/// A distribution target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
  Windows,
  Mac,
  Linux,
}

impl Platform {
  pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Mac, Platform::Linux];

  /// Short name used in task ids and directory names (`dist-win`).
  pub fn tag(&self) -> &'static str {
    match self {
      Platform::Windows => "win",
      Platform::Mac => "mac",
      Platform::Linux => "linux",
    }
  }

  /// Channel suffix understood by the push tool.
  pub fn channel(&self) -> &'static str {
    match self {
      Platform::Windows => "windows",
      Platform::Mac => "mac-osx",
      Platform::Linux => "linux",
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.tag())
  }
}

impl FromStr for Platform {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "win" | "windows" => Ok(Platform::Windows),
      "mac" | "macos" | "osx" => Ok(Platform::Mac),
      "linux" => Ok(Platform::Linux),
      other => Err(format!("unknown platform '{}', expected win, mac or linux", other)),
    }
  }
}

/// An assembled platform bundle, ready to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
  pub platform: Platform,
  /// Directory handed to the push tool.
  pub dir: PathBuf,
  /// Files written while assembling, in write order.
  pub files: Vec<PathBuf>,
  /// True when the archive was appended to the runtime executable.
  pub fused: bool,
}
