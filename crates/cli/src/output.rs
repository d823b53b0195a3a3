//! Terminal output for the `vore` CLI.
//!
//! Colored status lines, human-readable sizes and durations, and the
//! summary printed after a pipeline run.

use std::time::Duration;

use owo_colors::{OwoColorize, Stream};
use vore_lib::graph::{GraphReport, TaskId, TaskStatus};

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
  pub const SKIP: &str = "-";
}

pub fn format_bytes(bytes: u64) -> String {
  const KB: u64 = 1024;
  const MB: u64 = KB * 1024;
  const GB: u64 = MB * 1024;

  if bytes >= GB {
    format!("{:.1} GB", bytes as f64 / GB as f64)
  } else if bytes >= MB {
    format!("{:.1} MB", bytes as f64 / MB as f64)
  } else if bytes >= KB {
    format!("{:.1} KB", bytes as f64 / KB as f64)
  } else {
    format!("{} B", bytes)
  }
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// One line per task that ran, then failures and skips.
pub fn print_report(report: &GraphReport) {
  for record in &report.records {
    let elapsed = record.elapsed().map(format_duration).unwrap_or_default();
    match record.status {
      TaskStatus::Succeeded => println!(
        "  {} {} {}",
        symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
        record.id,
        elapsed.if_supports_color(Stream::Stdout, |s| s.dimmed())
      ),
      TaskStatus::Failed => println!(
        "  {} {} {}",
        symbols::ERROR.if_supports_color(Stream::Stdout, |s| s.red()),
        record.id,
        elapsed.if_supports_color(Stream::Stdout, |s| s.dimmed())
      ),
      TaskStatus::Skipped => println!(
        "  {} {}",
        symbols::SKIP.if_supports_color(Stream::Stdout, |s| s.dimmed()),
        record.id.if_supports_color(Stream::Stdout, |s| s.dimmed())
      ),
      _ => {}
    }
  }

  for (id, err) in &report.failures {
    print_error(&format!("{} failed ({}): {}", id, err.kind(), err));
  }
  for (id, cause) in &report.skipped {
    print_warning(&format!("{} skipped because {} failed", id, cause));
  }
}

pub fn print_waves(waves: &[Vec<TaskId>]) {
  for (i, wave) in waves.iter().enumerate() {
    println!("{}", format!("wave {}", i + 1).if_supports_color(Stream::Stdout, |s| s.bold()));
    for id in wave {
      println!("  {} {}", symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.cyan()), id);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_bytes() {
    assert_eq!(format_bytes(500), "500 B");
    assert_eq!(format_bytes(1024), "1.0 KB");
    assert_eq!(format_bytes(1536), "1.5 KB");
    assert_eq!(format_bytes(1048576), "1.0 MB");
  }

  #[test]
  fn test_format_duration() {
    assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
    assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
  }
}
