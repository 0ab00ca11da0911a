//! Shortest-path planning over the conversion graph.
//!
//! Given a source and destination kind, [`PathPlanner`] finds the shortest
//! chain of direct converters connecting them. The search runs
//! breadth-first over the registry's edges, with `many`-lifted edges treated
//! as first-class neighbors, across the Cartesian product of *effective*
//! endpoints: every kind the source value can act as, times every concrete
//! kind the destination expands to.
//!
//! Results, including negative ones, are memoized per `(src, dst)`. The
//! fabric invalidates the cache whenever the registry changes. The visited
//! set bounds the search, so planning terminates on cyclic registries.

use crate::kind::{assignable, Kind};
use crate::registry::ConversionRegistry;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A planned chain of kinds. Adjacent pairs are backed by direct or
/// `many`-lifted registry edges; a single-element path is an identity pass.
pub type Path = Arc<Vec<Kind>>;

/// Memoizing shortest-path planner.
#[derive(Default)]
pub struct PathPlanner {
  cache: Mutex<HashMap<(Kind, Kind), Option<Path>>>,
}

impl PathPlanner {
  /// Creates a planner with an empty cache.
  pub fn new() -> Self {
    Self::default()
  }

  /// Plans the shortest conversion chain from `src` to `dst`.
  ///
  /// Returns `None` when no path exists. When the source is already
  /// acceptable as the destination the path is the singleton `[src]` and the
  /// driver performs an identity pass.
  pub fn plan(&self, registry: &ConversionRegistry, src: Kind, dst: Kind) -> Option<Path> {
    if assignable(src, dst) {
      return Some(Arc::new(vec![src]));
    }
    if let Some(cached) = self.cache.lock().unwrap().get(&(src, dst)) {
      return cached.clone();
    }

    let mut best: Option<Vec<Kind>> = None;
    for s in registry.valid_sources(src) {
      for d in registry.valid_destinations(dst) {
        if let Some(path) = shortest(registry, s, d) {
          let better = best.as_ref().map_or(true, |b| path.len() < b.len());
          if better {
            best = Some(path);
          }
        }
      }
    }

    let planned = best.map(Arc::new);
    match &planned {
      Some(path) => debug!(src = %src, dst = %dst, hops = path.len() - 1, "planned conversion"),
      None => debug!(src = %src, dst = %dst, "no conversion path"),
    }
    self
      .cache
      .lock()
      .unwrap()
      .insert((src, dst), planned.clone());
    planned
  }

  /// Drops every memoized plan. Called when the registry changes.
  pub fn invalidate(&self) {
    self.cache.lock().unwrap().clear();
  }
}

/// Breadth-first shortest node sequence from `start` to a kind acceptable as
/// `goal`.
fn shortest(registry: &ConversionRegistry, start: Kind, goal: Kind) -> Option<Vec<Kind>> {
  if assignable(start, goal) {
    return Some(vec![start]);
  }
  let mut visited: HashSet<Kind> = HashSet::new();
  let mut parent: HashMap<Kind, Kind> = HashMap::new();
  let mut queue: VecDeque<Kind> = VecDeque::new();
  visited.insert(start);
  queue.push_back(start);

  while let Some(node) = queue.pop_front() {
    for next in registry.neighbors(node) {
      if !visited.insert(next) {
        continue;
      }
      parent.insert(next, node);
      if assignable(next, goal) {
        let mut path = vec![next];
        let mut cursor = next;
        while let Some(prev) = parent.get(&cursor) {
          path.push(*prev);
          cursor = *prev;
        }
        path.reverse();
        return Some(path);
      }
      queue.push_back(next);
    }
  }
  None
}

/// Every kind reachable from `from` through the conversion graph, in
/// breadth-first order.
pub fn reachable(registry: &ConversionRegistry, from: Kind) -> Vec<Kind> {
  let mut out: Vec<Kind> = Vec::new();
  let mut visited: HashSet<Kind> = HashSet::new();
  let mut queue: VecDeque<Kind> = VecDeque::new();
  for start in registry.valid_sources(from) {
    if visited.insert(start) {
      queue.push_back(start);
    }
  }
  while let Some(node) = queue.pop_front() {
    for next in registry.neighbors(node) {
      if visited.insert(next) {
        out.push(next);
        queue.push_back(next);
      }
    }
  }
  out
}
