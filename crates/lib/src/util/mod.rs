//! Shared utilities.
//!
//! Path and glob helpers used by asset discovery and packaging, plus test
//! helpers.

use std::path::Path;

use glob::{MatchOptions, Pattern, PatternError};

#[cfg(test)]
pub mod testutil;

/// Glob options used everywhere: `*` never crosses a `/`.
pub const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: true,
  require_literal_leading_dot: false,
};

/// Render a relative path with `/` separators regardless of platform.
pub fn slash_path(path: &Path) -> String {
  path
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}

pub fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Pattern>, PatternError> {
  patterns.iter().map(|p| Pattern::new(p.as_ref())).collect()
}

/// True if the `/`-separated `relative` path matches any of `patterns`.
pub fn matches_any(patterns: &[Pattern], relative: &str) -> bool {
  patterns.iter().any(|p| p.matches_with(relative, MATCH_OPTIONS))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  #[test]
  fn slash_path_joins_components() {
    let path: PathBuf = ["data", "maps", "b.tmx"].iter().collect();
    assert_eq!(slash_path(&path), "data/maps/b.tmx");
  }

  #[test]
  fn recursive_patterns_match_top_level_files() {
    let patterns = compile_patterns(&["**/*.tmx"]).unwrap();

    assert!(matches_any(&patterns, "b.tmx"));
    assert!(matches_any(&patterns, "data/maps/b.tmx"));
    assert!(!matches_any(&patterns, "b_tmx.lua"));
  }

  #[test]
  fn single_star_does_not_cross_directories() {
    let patterns = compile_patterns(&["genobjectxml.lua"]).unwrap();

    assert!(matches_any(&patterns, "genobjectxml.lua"));
    assert!(!matches_any(&patterns, "tools/genobjectxml.lua"));

    let patterns = compile_patterns(&["*.lua"]).unwrap();
    assert!(!matches_any(&patterns, "ui/menu.lua"));
  }

  #[test]
  fn invalid_pattern_is_reported() {
    assert!(compile_patterns(&["[unclosed"]).is_err());
  }
}
