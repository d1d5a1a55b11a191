//! Cycle detection.
//!
//! A depth-first traversal marks each module unvisited, in progress or done.
//! An edge into an in-progress module closes a cycle, whose path is read off
//! the traversal stack. Cycles found inside the same strongly connected
//! component share modules and are merged into one [`Cycle`] report.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::warn;

use super::ModuleGraph;

/// One merged cycle report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
  /// Every module taking part in the merged cycles.
  pub modules: BTreeSet<String>,

  /// Each detected cycle as a closed path, e.g. `[A, B, A]`.
  pub paths: Vec<Vec<String>>,
}

impl Cycle {
  pub fn contains(&self, module: &str) -> bool {
    self.modules.contains(module)
  }
}

impl fmt::Display for Cycle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let paths: Vec<String> = self.paths.iter().map(|p| p.join(" -> ")).collect();
    write!(f, "{}", paths.join("; "))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
  InProgress,
  Done,
}

impl ModuleGraph {
  /// Find every compile-time cycle, merged per strongly connected component.
  ///
  /// Modules and their dependencies are visited in ascending name order, so the
  /// result is identical across runs.
  pub fn find_cycles(&self) -> Vec<Cycle> {
    let mut marks: HashMap<NodeIndex, Mark> = HashMap::new();
    let mut stack: Vec<NodeIndex> = Vec::new();
    let mut found: Vec<Vec<NodeIndex>> = Vec::new();

    for &start in self.nodes.values() {
      if !marks.contains_key(&start) {
        self.visit(start, &mut marks, &mut stack, &mut found);
      }
    }

    if found.is_empty() {
      return Vec::new();
    }

    let mut component_of: HashMap<NodeIndex, usize> = HashMap::new();
    for (component, members) in tarjan_scc(&self.graph).into_iter().enumerate() {
      for idx in members {
        component_of.insert(idx, component);
      }
    }

    // Merge in discovery order so the report order is stable too.
    let mut reports: Vec<(usize, Cycle)> = Vec::new();
    for path in found {
      let component = component_of[&path[0]];
      let names: Vec<String> = path.iter().map(|&idx| self.graph[idx].clone()).collect();

      match reports.iter_mut().find(|(c, _)| *c == component) {
        Some((_, cycle)) => {
          cycle.modules.extend(names.iter().cloned());
          cycle.paths.push(names);
        }
        None => reports.push((
          component,
          Cycle {
            modules: names.iter().cloned().collect(),
            paths: vec![names],
          },
        )),
      }
    }

    for (_, cycle) in &reports {
      warn!(cycle = %cycle, "dependency cycle detected");
    }

    reports.into_iter().map(|(_, cycle)| cycle).collect()
  }

  /// Depth-first walk from `start`, iterative so long chains do not grow the call stack.
  fn visit(
    &self,
    start: NodeIndex,
    marks: &mut HashMap<NodeIndex, Mark>,
    stack: &mut Vec<NodeIndex>,
    found: &mut Vec<Vec<NodeIndex>>,
  ) {
    // (module, its dependencies in name order, next dependency to follow)
    let mut frames: Vec<(NodeIndex, Vec<NodeIndex>, usize)> = Vec::new();
    self.enter(start, marks, stack, &mut frames);

    while let Some((idx, deps, next)) = frames.last_mut() {
      let Some(&dep) = deps.get(*next) else {
        marks.insert(*idx, Mark::Done);
        stack.pop();
        frames.pop();
        continue;
      };
      *next += 1;

      match marks.get(&dep) {
        None => self.enter(dep, marks, stack, &mut frames),
        Some(Mark::InProgress) => {
          if let Some(pos) = stack.iter().position(|&n| n == dep) {
            let mut path = stack[pos..].to_vec();
            path.push(dep);
            found.push(path);
          }
        }
        Some(Mark::Done) => {}
      }
    }
  }

  fn enter(
    &self,
    idx: NodeIndex,
    marks: &mut HashMap<NodeIndex, Mark>,
    stack: &mut Vec<NodeIndex>,
    frames: &mut Vec<(NodeIndex, Vec<NodeIndex>, usize)>,
  ) {
    marks.insert(idx, Mark::InProgress);
    stack.push(idx);

    let mut deps = self.distinct_neighbors(idx, Direction::Outgoing);
    deps.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
    frames.push((idx, deps, 0));
  }
}
