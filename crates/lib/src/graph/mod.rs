//! Task graph and scheduler.
//!
//! A [`TaskGraph`] is an explicit value: callers declare tasks with their
//! dependencies, narrow the graph to the targets they want, and execute it.
//! Execution is:
//! - dependency ordered: a task starts only after every dependency succeeded
//! - concurrent: ready tasks run on their own tokio task, up to `jobs` at once
//! - failure isolating: a failure skips every transitive dependent while
//!   unrelated tasks run to completion

pub mod dag;
pub mod types;

use std::any::Any;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

pub use dag::TaskDag;
pub use types::{FailureKind, GraphError, GraphReport, TaskError, TaskId, TaskRecord, TaskStatus};

pub type TaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send>>;
type TaskAction = Box<dyn FnOnce() -> TaskFuture + Send>;

/// A named unit of work with ordered dependencies.
pub struct Task {
  id: TaskId,
  deps: Vec<TaskId>,
  action: Option<TaskAction>,
}

impl Task {
  pub fn new<F, Fut>(id: impl Into<TaskId>, action: F) -> Self
  where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
  {
    Self {
      id: id.into(),
      deps: Vec::new(),
      action: Some(Box::new(move || Box::pin(action()) as TaskFuture)),
    }
  }

  /// A task that only groups its dependencies.
  pub fn noop(id: impl Into<TaskId>) -> Self {
    Self {
      id: id.into(),
      deps: Vec::new(),
      action: None,
    }
  }

  /// Add dependencies. Repeated ids are ignored.
  pub fn after<I, S>(mut self, deps: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<TaskId>,
  {
    for dep in deps {
      let dep = dep.into();
      if !self.deps.contains(&dep) {
        self.deps.push(dep);
      }
    }
    self
  }

  pub fn id(&self) -> &TaskId {
    &self.id
  }

  pub fn deps(&self) -> &[TaskId] {
    &self.deps
  }
}

impl std::fmt::Debug for Task {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Task")
      .field("id", &self.id)
      .field("deps", &self.deps)
      .finish_non_exhaustive()
  }
}

/// Declared tasks, in declaration order.
#[derive(Debug, Default)]
pub struct TaskGraph {
  tasks: Vec<Task>,
  index: HashMap<TaskId, usize>,
}

impl TaskGraph {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, task: Task) -> Result<(), GraphError> {
    if self.index.contains_key(task.id()) {
      return Err(GraphError::DuplicateTask(task.id().clone()));
    }
    self.index.insert(task.id().clone(), self.tasks.len());
    self.tasks.push(task);
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  pub fn contains(&self, id: &str) -> bool {
    self.index.contains_key(&TaskId::from(id))
  }

  pub fn ids(&self) -> impl Iterator<Item = &TaskId> {
    self.tasks.iter().map(|t| t.id())
  }

  pub fn task(&self, id: &str) -> Option<&Task> {
    self.index.get(&TaskId::from(id)).map(|&i| &self.tasks[i])
  }

  /// Keep only `targets` and everything they transitively depend on.
  pub fn select<I, S>(self, targets: I) -> Result<TaskGraph, GraphError>
  where
    I: IntoIterator<Item = S>,
    S: Into<TaskId>,
  {
    let mut keep: HashSet<usize> = HashSet::new();
    let mut stack = Vec::new();

    for target in targets {
      let target = target.into();
      let idx = *self.index.get(&target).ok_or(GraphError::UnknownTarget(target))?;
      stack.push(idx);
    }

    while let Some(idx) = stack.pop() {
      if !keep.insert(idx) {
        continue;
      }
      let task = &self.tasks[idx];
      for dep in task.deps() {
        let dep_idx = *self.index.get(dep).ok_or_else(|| GraphError::UnknownDependency {
          task: task.id().clone(),
          dependency: dep.clone(),
        })?;
        stack.push(dep_idx);
      }
    }

    let mut selected = TaskGraph::new();
    for (idx, task) in self.tasks.into_iter().enumerate() {
      if keep.contains(&idx) {
        selected.add(task)?;
      }
    }
    Ok(selected)
  }

  pub fn validate(&self) -> Result<TaskDag, GraphError> {
    TaskDag::from_tasks(&self.tasks)
  }

  pub fn execution_waves(&self) -> Result<Vec<Vec<TaskId>>, GraphError> {
    Ok(self.validate()?.execution_waves())
  }

  /// Run every task, at most `jobs` at a time.
  ///
  /// Task failures are recorded in the report, not returned: `Err` means the
  /// graph itself is invalid.
  pub async fn execute(self, jobs: usize) -> Result<GraphReport, GraphError> {
    let dag = self.validate()?;
    let jobs = jobs.max(1);
    let total = self.tasks.len();

    info!(tasks = total, jobs, "executing task graph");

    let mut records = Vec::with_capacity(total);
    let mut actions = Vec::with_capacity(total);
    for task in self.tasks {
      records.push(TaskRecord {
        id: task.id,
        status: TaskStatus::Pending,
        started: None,
        finished: None,
      });
      actions.push(task.action);
    }

    let mut report = GraphReport::default();
    let mut waiting: Vec<usize> = (0..total).map(|i| dag.dependency_count(i)).collect();
    let mut ready: BTreeSet<usize> = (0..total).filter(|&i| waiting[i] == 0).collect();
    let mut running: JoinSet<(usize, Result<(), TaskError>)> = JoinSet::new();

    loop {
      while running.len() < jobs {
        let Some(idx) = ready.pop_first() else {
          break;
        };
        let record = &mut records[idx];
        record.status = TaskStatus::Running;
        record.started = Some(Instant::now());
        debug!(task = %record.id, "task started");

        let action = actions[idx].take();
        running.spawn(async move { (idx, run_isolated(action).await) });
      }

      let Some(joined) = running.join_next().await else {
        break;
      };
      let (idx, result) = joined.map_err(|e| GraphError::Interrupted(e.to_string()))?;

      let record = &mut records[idx];
      record.finished = Some(Instant::now());

      match result {
        Ok(()) => {
          record.status = TaskStatus::Succeeded;
          let elapsed_ms = record.elapsed().map(|d| d.as_millis() as u64).unwrap_or(0);
          info!(task = %record.id, elapsed_ms, "task succeeded");

          for dependent in dag.dependents(idx) {
            if records[dependent].status != TaskStatus::Pending {
              continue;
            }
            waiting[dependent] -= 1;
            if waiting[dependent] == 0 {
              ready.insert(dependent);
            }
          }
        }
        Err(err) => {
          record.status = TaskStatus::Failed;
          let failed = record.id.clone();
          error!(task = %failed, kind = %err.kind(), error = %err, "task failed");

          skip_dependents(&dag, idx, &failed, &mut records, &mut report.skipped);
          report.failures.push((failed, err));
        }
      }
    }

    info!(
      succeeded = records.iter().filter(|r| r.status == TaskStatus::Succeeded).count(),
      failed = report.failures.len(),
      skipped = report.skipped.len(),
      "task graph complete"
    );

    report.records = records;
    Ok(report)
  }
}

/// Run `action` on its own tokio task so a panic fails only this task.
async fn run_isolated(action: Option<TaskAction>) -> Result<(), TaskError> {
  let Some(action) = action else {
    return Ok(());
  };

  match tokio::spawn(action()).await {
    Ok(result) => result,
    Err(e) if e.is_panic() => Err(TaskError::Panicked(panic_message(e.into_panic()))),
    Err(e) => Err(TaskError::Panicked(e.to_string())),
  }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    s.to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "unknown panic".to_string()
  }
}

fn skip_dependents(
  dag: &TaskDag,
  failed_idx: usize,
  failed: &TaskId,
  records: &mut [TaskRecord],
  skipped: &mut Vec<(TaskId, TaskId)>,
) {
  let mut stack = dag.dependents(failed_idx);
  while let Some(idx) = stack.pop() {
    if records[idx].status != TaskStatus::Pending {
      continue;
    }
    records[idx].status = TaskStatus::Skipped;
    warn!(task = %records[idx].id, failed_dependency = %failed, "skipping task due to failed dependency");
    skipped.push((records[idx].id.clone(), failed.clone()));
    stack.extend(dag.dependents(idx));
  }
}
