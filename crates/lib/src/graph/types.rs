//! Types for task graph execution.

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::ConfigError;
use crate::dist::{BundleError, FetchError};
use crate::pack::PackError;
use crate::publish::PublishError;
use crate::tool::ToolError;
use crate::transpile::TranspileError;

/// Name of a task (`build:moon`, `dist:win:fused`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub String);

impl TaskId {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for TaskId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for TaskId {
  fn from(s: &str) -> Self {
    TaskId(s.to_string())
  }
}

impl From<String> for TaskId {
  fn from(s: String) -> Self {
    TaskId(s)
  }
}

impl From<&TaskId> for TaskId {
  fn from(id: &TaskId) -> Self {
    id.clone()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
  Pending,
  Running,
  Succeeded,
  Failed,
  /// Not run because a dependency failed.
  Skipped,
}

/// Coarse classification of a task failure, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// An external tool could not be started or exited unsuccessfully.
  ToolInvocation,
  /// Reading or writing project files failed.
  FileSystem,
  /// A download failed.
  Network,
  /// Misconfiguration or a panicking task.
  Internal,
}

impl fmt::Display for FailureKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      FailureKind::ToolInvocation => "tool invocation failure",
      FailureKind::FileSystem => "file system failure",
      FailureKind::Network => "network failure",
      FailureKind::Internal => "internal failure",
    })
  }
}

/// Errors a task action can fail with.
#[derive(Debug, Error)]
pub enum TaskError {
  #[error(transparent)]
  Tool(#[from] ToolError),

  #[error(transparent)]
  Transpile(#[from] TranspileError),

  #[error(transparent)]
  Pack(#[from] PackError),

  #[error(transparent)]
  Fetch(#[from] FetchError),

  #[error(transparent)]
  Bundle(#[from] BundleError),

  #[error(transparent)]
  Publish(#[from] PublishError),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("task panicked: {0}")]
  Panicked(String),
}

fn tool_kind(err: &ToolError) -> FailureKind {
  match err {
    ToolError::NotConfigured { .. } => FailureKind::Internal,
    _ => FailureKind::ToolInvocation,
  }
}

impl TaskError {
  pub fn kind(&self) -> FailureKind {
    match self {
      TaskError::Tool(e) => tool_kind(e),
      TaskError::Transpile(TranspileError::Tool { source, .. }) => tool_kind(source),
      TaskError::Transpile(TranspileError::Pattern { .. } | TranspileError::Join(_)) => FailureKind::Internal,
      TaskError::Transpile(_) => FailureKind::FileSystem,
      TaskError::Pack(PackError::Pattern { .. } | PackError::Join(_)) => FailureKind::Internal,
      TaskError::Pack(_) => FailureKind::FileSystem,
      TaskError::Fetch(FetchError::Request { .. } | FetchError::Status { .. }) => FailureKind::Network,
      TaskError::Fetch(FetchError::Join(_)) => FailureKind::Internal,
      TaskError::Fetch(_) => FailureKind::FileSystem,
      TaskError::Bundle(BundleError::ReservedName(_)) => FailureKind::Internal,
      TaskError::Bundle(_) => FailureKind::FileSystem,
      TaskError::Publish(PublishError::Tool(e)) => tool_kind(e),
      TaskError::Publish(PublishError::MissingGame) => FailureKind::Internal,
      TaskError::Config(_) => FailureKind::Internal,
      TaskError::Io(_) => FailureKind::FileSystem,
      TaskError::Panicked(_) => FailureKind::Internal,
    }
  }
}

/// Errors in the shape of the graph itself.
#[derive(Debug, Error)]
pub enum GraphError {
  #[error("task declared twice: {0}")]
  DuplicateTask(TaskId),

  #[error("task {task} depends on unknown task {dependency}")]
  UnknownDependency { task: TaskId, dependency: TaskId },

  #[error("unknown task: {0}")]
  UnknownTarget(TaskId),

  #[error("dependency cycle detected at task {0}")]
  CycleDetected(TaskId),

  #[error("task runner stopped unexpectedly: {0}")]
  Interrupted(String),
}

/// What happened to one task.
#[derive(Debug, Clone)]
pub struct TaskRecord {
  pub id: TaskId,
  pub status: TaskStatus,
  pub started: Option<Instant>,
  pub finished: Option<Instant>,
}

impl TaskRecord {
  pub fn elapsed(&self) -> Option<Duration> {
    match (self.started, self.finished) {
      (Some(start), Some(end)) => Some(end.duration_since(start)),
      _ => None,
    }
  }
}

/// Outcome of executing a graph.
#[derive(Debug, Default)]
pub struct GraphReport {
  /// One record per task, in declaration order.
  pub records: Vec<TaskRecord>,

  /// Failed tasks, in the order they finished.
  pub failures: Vec<(TaskId, TaskError)>,

  /// Skipped tasks and the failed task that caused the skip.
  pub skipped: Vec<(TaskId, TaskId)>,
}

impl GraphReport {
  pub fn is_success(&self) -> bool {
    self.failures.is_empty() && self.skipped.is_empty()
  }

  /// The failure to report to the user.
  pub fn first_failure(&self) -> Option<&(TaskId, TaskError)> {
    self.failures.first()
  }

  pub fn record(&self, id: &str) -> Option<&TaskRecord> {
    self.records.iter().find(|r| r.id.as_str() == id)
  }

  pub fn status(&self, id: &str) -> Option<TaskStatus> {
    self.record(id).map(|r| r.status)
  }

  pub fn count(&self, status: TaskStatus) -> usize {
    self.records.iter().filter(|r| r.status == status).count()
  }
}
