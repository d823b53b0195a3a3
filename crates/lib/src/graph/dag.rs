//! Dependency DAG over declared tasks.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use super::Task;
use super::types::{GraphError, TaskId};

/// Validated dependency structure of a task list.
///
/// Node `i` is the `i`-th declared task, with edges pointing from a
/// dependency to its dependents.
pub struct TaskDag {
  graph: DiGraph<TaskId, ()>,
}

impl TaskDag {
  /// Build the DAG for `tasks`.
  ///
  /// # Errors
  ///
  /// - `UnknownDependency` if a task names a dependency that was never declared
  /// - `CycleDetected` if the dependencies form a cycle
  pub fn from_tasks(tasks: &[Task]) -> Result<Self, GraphError> {
    let mut graph = DiGraph::with_capacity(tasks.len(), tasks.len());
    let mut nodes: HashMap<&TaskId, NodeIndex> = HashMap::new();

    for task in tasks {
      let idx = graph.add_node(task.id().clone());
      nodes.insert(task.id(), idx);
    }

    for task in tasks {
      let dependent = nodes[task.id()];
      for dep in task.deps() {
        let Some(&dependency) = nodes.get(dep) else {
          return Err(GraphError::UnknownDependency {
            task: task.id().clone(),
            dependency: dep.clone(),
          });
        };
        graph.add_edge(dependency, dependent, ());
      }
    }

    let dag = Self { graph };
    dag.verify_acyclic()?;
    Ok(dag)
  }

  fn verify_acyclic(&self) -> Result<(), GraphError> {
    toposort(&self.graph, None).map_err(|cycle| GraphError::CycleDetected(self.graph[cycle.node_id()].clone()))?;
    Ok(())
  }

  /// Number of distinct dependencies of task `idx`.
  pub fn dependency_count(&self, idx: usize) -> usize {
    self
      .graph
      .neighbors_directed(NodeIndex::new(idx), Direction::Incoming)
      .count()
  }

  /// Tasks that depend directly on task `idx`, in declaration order.
  pub fn dependents(&self, idx: usize) -> Vec<usize> {
    let mut out: Vec<usize> = self
      .graph
      .neighbors_directed(NodeIndex::new(idx), Direction::Outgoing)
      .map(|n| n.index())
      .collect();
    out.sort_unstable();
    out.dedup();
    out
  }

  /// Group tasks into waves: every task's dependencies lie in earlier waves.
  ///
  /// Within a wave, tasks keep their declaration order.
  pub fn execution_waves(&self) -> Vec<Vec<TaskId>> {
    let mut in_degree: Vec<usize> = (0..self.graph.node_count()).map(|i| self.dependency_count(i)).collect();
    let mut current: Vec<usize> = (0..in_degree.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut waves = Vec::new();

    while !current.is_empty() {
      let mut next = Vec::new();
      for &idx in &current {
        for dependent in self.graph.neighbors_directed(NodeIndex::new(idx), Direction::Outgoing) {
          let deg = &mut in_degree[dependent.index()];
          *deg = deg.saturating_sub(1);
          if *deg == 0 {
            next.push(dependent.index());
          }
        }
      }
      waves.push(current.iter().map(|&i| self.graph[NodeIndex::new(i)].clone()).collect());
      next.sort_unstable();
      next.dedup();
      current = next;
    }

    waves
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ids(wave: &[TaskId]) -> Vec<&str> {
    wave.iter().map(|id| id.as_str()).collect()
  }

  #[test]
  fn waves_follow_dependency_depth() {
    let tasks = vec![
      Task::noop("build:lua"),
      Task::noop("build:moon"),
      Task::noop("build").after(["build:lua", "build:moon"]),
      Task::noop("dist:zip").after(["build"]),
      Task::noop("dist:win:download-love"),
    ];

    let waves = TaskDag::from_tasks(&tasks).unwrap().execution_waves();

    assert_eq!(waves.len(), 3);
    assert_eq!(ids(&waves[0]), vec!["build:lua", "build:moon", "dist:win:download-love"]);
    assert_eq!(ids(&waves[1]), vec!["build"]);
    assert_eq!(ids(&waves[2]), vec!["dist:zip"]);
  }

  #[test]
  fn unknown_dependency_is_rejected() {
    let tasks = vec![Task::noop("dist:zip").after(["build"])];

    let err = TaskDag::from_tasks(&tasks).err().unwrap();

    assert!(matches!(err, GraphError::UnknownDependency { dependency, .. } if dependency.as_str() == "build"));
  }

  #[test]
  fn cycles_are_rejected() {
    let tasks = vec![
      Task::noop("a").after(["c"]),
      Task::noop("b").after(["a"]),
      Task::noop("c").after(["b"]),
    ];

    assert!(matches!(TaskDag::from_tasks(&tasks), Err(GraphError::CycleDetected(_))));
  }

  #[test]
  fn dependents_are_in_declaration_order() {
    let tasks = vec![
      Task::noop("dist:zip"),
      Task::noop("dist:linux").after(["dist:zip"]),
      Task::noop("dist:win:fused").after(["dist:zip"]),
    ];

    let dag = TaskDag::from_tasks(&tasks).unwrap();

    assert_eq!(dag.dependents(0), vec![1, 2]);
    assert_eq!(dag.dependency_count(2), 1);
  }
}
