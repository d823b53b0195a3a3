//! External tool invocation.
//!
//! Every collaborator vore drives (script compiler, tilemap and sprite
//! exporters, runtime player, push tool) is run through this module. Unlike
//! a sandboxed build step, tools inherit the orchestrator's environment
//! unmodified; per-invocation overrides are layered on top.
//!
//! There is no timeout: a tool that never exits stalls its task.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::config::{Binaries, Tool};

/// Errors from running an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
  /// The tool has no executable configured in `config.json`.
  #[error("{tool} is not configured; set its path in config.json")]
  NotConfigured { tool: Tool },

  /// The process could not be started (usually a missing executable).
  #[error("failed to start {tool} ({}): {source}", program.display())]
  Spawn {
    tool: Tool,
    program: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The process started but waiting on it failed.
  #[error("failed to wait for {tool} ({}): {source}", program.display())]
  Wait {
    tool: Tool,
    program: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The process exited unsuccessfully.
  #[error("{tool} failed with exit code {}: {}", display_code(*code), stderr.trim())]
  Failed {
    tool: Tool,
    program: PathBuf,
    code: Option<i32>,
    stderr: String,
  },
}

fn display_code(code: Option<i32>) -> String {
  code.map(|c| c.to_string()).unwrap_or_else(|| "none (killed by signal)".to_string())
}

/// A single call to an external tool.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
  pub tool: Tool,
  pub program: PathBuf,
  pub args: Vec<OsString>,
  pub env: BTreeMap<String, String>,
  pub cwd: Option<PathBuf>,
}

impl ToolInvocation {
  pub fn new(tool: Tool, program: impl Into<PathBuf>) -> Self {
    Self {
      tool,
      program: program.into(),
      args: Vec::new(),
      env: BTreeMap::new(),
      cwd: None,
    }
  }

  /// Start an invocation of the executable configured for `tool`.
  pub fn configured(binaries: &Binaries, tool: Tool) -> Result<Self, ToolError> {
    let program = binaries.path(tool).ok_or(ToolError::NotConfigured { tool })?;
    Ok(Self::new(tool, program))
  }

  pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
    self.args.push(arg.as_ref().to_os_string());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.insert(key.into(), value.into());
    self
  }

  pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
    self.cwd = Some(dir.as_ref().to_path_buf());
    self
  }

  fn command(&self) -> Command {
    let mut command = Command::new(&self.program);
    command.args(&self.args).envs(&self.env).stdin(Stdio::null());
    if let Some(cwd) = &self.cwd {
      command.current_dir(cwd);
    }
    command
  }

  fn spawn_error(&self, source: std::io::Error) -> ToolError {
    ToolError::Spawn {
      tool: self.tool,
      program: self.program.clone(),
      source,
    }
  }

  fn check_status(&self, status: std::process::ExitStatus, stderr: &str) -> Result<(), ToolError> {
    if status.success() {
      return Ok(());
    }

    error!(
      tool = %self.tool,
      code = ?status.code(),
      stderr = %stderr.trim(),
      "tool failed"
    );

    Err(ToolError::Failed {
      tool: self.tool,
      program: self.program.clone(),
      code: status.code(),
      stderr: stderr.to_string(),
    })
  }
}

/// Captured result of a successful invocation.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
  /// Raw stdout; some tools write their artifact here.
  pub stdout: Vec<u8>,
  pub stderr: String,
}

/// Run a tool to completion, capturing stdout and stderr.
///
/// # Errors
///
/// - [`ToolError::Spawn`] if the executable cannot be started
/// - [`ToolError::Failed`] on a non-zero exit, carrying the captured stderr
pub async fn invoke(invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
  info!(tool = %invocation.tool, program = %invocation.program.display(), "invoking tool");
  debug!(args = ?invocation.args, env = ?invocation.env, "tool arguments");

  let output = invocation
    .command()
    .output()
    .await
    .map_err(|e| invocation.spawn_error(e))?;

  let stderr = String::from_utf8_lossy(&output.stderr).to_string();
  invocation.check_status(output.status, &stderr)?;

  if !stderr.trim().is_empty() {
    debug!(tool = %invocation.tool, stderr = %stderr.trim(), "tool stderr");
  }

  Ok(ToolOutput {
    stdout: output.stdout,
    stderr,
  })
}

/// Run a tool, forwarding its output to the log line by line as it arrives.
///
/// Used for long-running tools whose progress the user wants to see (the
/// runtime player, the push tool). Output is still captured for the result.
pub async fn invoke_streaming(invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
  info!(tool = %invocation.tool, program = %invocation.program.display(), "invoking tool");
  debug!(args = ?invocation.args, env = ?invocation.env, "tool arguments");

  let mut child = invocation
    .command()
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .map_err(|e| invocation.spawn_error(e))?;

  let stdout = tokio::spawn(forward_lines(child.stdout.take(), invocation.tool, false));
  let stderr = tokio::spawn(forward_lines(child.stderr.take(), invocation.tool, true));

  let status = child.wait().await.map_err(|source| ToolError::Wait {
    tool: invocation.tool,
    program: invocation.program.clone(),
    source,
  })?;

  let stdout = stdout.await.unwrap_or_default();
  let stderr = stderr.await.unwrap_or_default();

  invocation.check_status(status, &stderr)?;

  Ok(ToolOutput {
    stdout: stdout.into_bytes(),
    stderr,
  })
}

async fn forward_lines<R>(reader: Option<R>, tool: Tool, is_stderr: bool) -> String
where
  R: AsyncRead + Unpin,
{
  let Some(reader) = reader else {
    return String::new();
  };

  let mut captured = String::new();
  let mut reader = BufReader::new(reader);
  let mut buf = Vec::new();

  // Drained to EOF whatever the bytes; lines are decoded lossily.
  loop {
    buf.clear();
    match reader.read_until(b'\n', &mut buf).await {
      Ok(0) => break,
      Ok(_) => {
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\n', '\r']);
        if is_stderr {
          warn!(tool = %tool, "{}", line);
        } else {
          info!(tool = %tool, "{}", line);
        }
        captured.push_str(line);
        captured.push('\n');
      }
      Err(e) => {
        debug!(tool = %tool, error = %e, "stopped reading tool output");
        break;
      }
    }
  }

  captured
}
