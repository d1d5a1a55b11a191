//! Compile-time module dependency graph.
//!
//! Edges run from a module to the modules it links against (public or private
//! compile-time dependencies). Runtime-only dependencies and private
//! include-path modules are not edges: they are resolved lazily or only
//! contribute headers, so they may form cycles freely.
//!
//! The graph provides:
//! - Cycle detection with three-color DFS (see [`cycles`])
//! - Deterministic topological ordering, leaves first, ties broken by name

pub mod cycles;

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, trace};

use crate::descriptor::EffectiveDescriptor;
use crate::resolve::ResolveError;

pub use cycles::Cycle;

/// How a module depends on another at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepKind {
  Public,
  Private,
}

/// The compile-time dependency graph of one build invocation.
#[derive(Debug, Default)]
pub struct ModuleGraph {
  graph: DiGraph<String, DepKind>,

  /// Node lookup by module name. Ordered so traversals are deterministic.
  nodes: BTreeMap<String, NodeIndex>,
}

impl ModuleGraph {
  /// Build the graph from effective descriptors.
  ///
  /// Every compile-time dependency must name a module in `modules`; unknown
  /// names are skipped here and are expected to have been reported already.
  pub fn from_descriptors<'a>(modules: impl IntoIterator<Item = &'a EffectiveDescriptor>) -> Self {
    let modules: Vec<&EffectiveDescriptor> = modules.into_iter().collect();
    let mut graph = DiGraph::with_capacity(modules.len(), 0);
    let mut nodes = BTreeMap::new();

    for module in &modules {
      let idx = graph.add_node(module.name.clone());
      nodes.insert(module.name.clone(), idx);
    }

    for module in &modules {
      let from = nodes[&module.name];
      let edges = module
        .public_dependencies
        .iter()
        .map(|dep| (dep, DepKind::Public))
        .chain(module.private_dependencies.iter().map(|dep| (dep, DepKind::Private)));

      for (dep, kind) in edges {
        match nodes.get(dep) {
          Some(&to) => {
            graph.add_edge(from, to, kind);
          }
          None => trace!(module = %module.name, dependency = %dep, "skipping edge to unknown module"),
        }
      }
    }

    debug!(modules = graph.node_count(), edges = graph.edge_count(), "built module graph");

    Self { graph, nodes }
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.nodes.contains_key(name)
  }

  /// Direct compile-time dependencies of `name`, sorted by name.
  pub fn dependencies(&self, name: &str) -> Vec<&str> {
    self.neighbors(name, Direction::Outgoing)
  }

  /// Modules that depend on `name` at compile time, sorted by name.
  pub fn dependents(&self, name: &str) -> Vec<&str> {
    self.neighbors(name, Direction::Incoming)
  }

  fn neighbors(&self, name: &str, direction: Direction) -> Vec<&str> {
    let Some(&idx) = self.nodes.get(name) else {
      return Vec::new();
    };

    let mut out: Vec<&str> = self
      .graph
      .neighbors_directed(idx, direction)
      .map(|n| self.graph[n].as_str())
      .collect();
    out.sort_unstable();
    out.dedup();
    out
  }

  /// Compute the build order: every module after all of its compile-time
  /// dependencies, ties among ready modules broken by ascending name.
  ///
  /// # Errors
  ///
  /// Returns `CyclicDependency` if the graph has a cycle.
  pub fn build_order(&self) -> Result<Vec<String>, ResolveError> {
    let cycles = self.find_cycles();
    if !cycles.is_empty() {
      return Err(ResolveError::CyclicDependency { cycles });
    }

    // Remaining unbuilt dependencies per node.
    let mut pending: HashMap<NodeIndex, usize> = self
      .graph
      .node_indices()
      .map(|idx| (idx, self.distinct_neighbors(idx, Direction::Outgoing).len()))
      .collect();

    let mut ready: BinaryHeap<Reverse<(&str, NodeIndex)>> = pending
      .iter()
      .filter(|(_, count)| **count == 0)
      .map(|(&idx, _)| Reverse((self.graph[idx].as_str(), idx)))
      .collect();

    let mut order = Vec::with_capacity(self.graph.node_count());
    while let Some(Reverse((name, idx))) = ready.pop() {
      trace!(module = name, position = order.len(), "scheduled");
      order.push(name.to_string());

      for dependent in self.distinct_neighbors(idx, Direction::Incoming) {
        if let Some(count) = pending.get_mut(&dependent) {
          *count -= 1;
          if *count == 0 {
            ready.push(Reverse((self.graph[dependent].as_str(), dependent)));
          }
        }
      }
    }

    if order.len() != self.graph.node_count() {
      return Err(ResolveError::CyclicDependency {
        cycles: self.find_cycles(),
      });
    }

    Ok(order)
  }

  /// Neighbours with parallel edges collapsed (a module may list the same
  /// dependency under several kinds before normalization).
  fn distinct_neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
    let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
    out.sort_unstable();
    out.dedup();
    out
  }
}
