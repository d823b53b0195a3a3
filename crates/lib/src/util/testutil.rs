//! Test utilities for vore-lib.
//!
//! Helpers that stand in for external tools with tiny shell scripts, and
//! that lay out throwaway projects.

use std::fs;
use std::path::{Path, PathBuf};

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(&path, content).unwrap();
  path
}

/// Write an executable `/bin/sh` script named `name` into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(name);
  fs::create_dir_all(dir).unwrap();
  fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
  fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  path
}

/// A fake script compiler: `moonc -p <file>` prints a compiled chunk and
/// appends one line per call to `log`.
#[cfg(unix)]
pub fn fake_script_compiler(dir: &Path, log: &Path) -> PathBuf {
  write_script(
    dir,
    "moonc",
    &format!(
      "echo \"$2\" >> '{}'\nprintf 'return \"%s\"\\n' \"$(basename \"$2\")\"",
      log.display()
    ),
  )
}

/// A fake tilemap exporter: `tiled --export-map <in> <out>`.
#[cfg(unix)]
pub fn fake_tilemap_exporter(dir: &Path, log: &Path) -> PathBuf {
  write_script(
    dir,
    "tiled",
    &format!("echo \"$2\" >> '{}'\necho 'return {{}}' > \"$3\"", log.display()),
  )
}

/// A fake sprite exporter writing both `--sheet` and `--data` outputs.
///
/// Arguments: `-b --list-tags --format json-array <in> --sheet <png> --data <json>`.
#[cfg(unix)]
pub fn fake_sprite_exporter(dir: &Path, log: &Path) -> PathBuf {
  write_script(
    dir,
    "aseprite",
    &format!(
      "echo \"$5\" >> '{}'\nprintf 'PNG' > \"$7\"\nprintf '[]' > \"$9\"",
      log.display()
    ),
  )
}

/// An in-memory zip holding `entries` (path, content), in order.
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
  use std::io::{Cursor, Write};
  use zip::write::SimpleFileOptions;

  let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
  for (name, content) in entries {
    writer.start_file(*name, SimpleFileOptions::default()).unwrap();
    writer.write_all(content.as_bytes()).unwrap();
  }
  writer.finish().unwrap().into_inner()
}

/// Number of lines in a call log (0 if the log does not exist).
pub fn call_count(log: &Path) -> usize {
  fs::read_to_string(log).map(|s| s.lines().count()).unwrap_or(0)
}
