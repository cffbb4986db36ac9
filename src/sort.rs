//! Dependency sorting.
//!
//! Starting from a root module, requirements are followed depth-first to rank every reachable
//! module. A module’s rank is the length of the longest requirement chain below it: modules
//! requiring nothing get rank 0 and every module ranks strictly higher than any of its
//! requirements. Emitting modules by ascending rank is thus always valid.
//!
//! Sorting state lives in the [`Order`] returned by [`sort`]; modules themselves are never marked.

use std::collections::HashMap;

use crate::error::{Error, ErrorKind, Result};
use crate::set::ModuleSet;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mark {
  Unvisited,
  InProgress,
  Done,
}

/// Result of a sort: the rank of every module reachable from the root.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Order {
  root: usize,
  ranks: Vec<Option<usize>>,
}

impl Order {
  /// Position of the root module.
  pub fn root(&self) -> usize {
    self.root
  }

  /// Rank of the module at `index`; `None` if it’s not reachable from the root.
  pub fn rank(&self, index: usize) -> Option<usize> {
    self.ranks.get(index).cloned().and_then(|rank| rank)
  }

  pub fn is_reachable(&self, index: usize) -> bool {
    self.rank(index).is_some()
  }

  /// Number of reachable modules, root included.
  pub fn reachable_count(&self) -> usize {
    self.ranks.iter().filter(|rank| rank.is_some()).count()
  }

  /// Highest rank; this is always the root’s.
  pub fn max_rank(&self) -> usize {
    self.ranks.iter().filter_map(|&rank| rank).max().unwrap_or(0)
  }

  /// Positions of the reachable modules in emission order: ascending rank, then position in the
  /// set.
  pub fn emission_order(&self) -> Vec<usize> {
    let mut order: Vec<usize> = (0..self.ranks.len()).filter(|&i| self.ranks[i].is_some()).collect();
    order.sort_by_key(|&i| (self.ranks[i], i));
    order
  }
}

/// Rank the modules reachable from the module at position `root`.
pub fn sort(set: &ModuleSet, root: usize) -> Result<Order> {
  if root >= set.len() {
    return Err(Error::new(ErrorKind::ModuleNotFound, format!("no module at position {}", root)));
  }

  let index: HashMap<&str, usize> = set.iter().enumerate().map(|(i, module)| (module.name(), i)).collect();
  let mut visitor = Visitor {
    set,
    index,
    marks: vec![Mark::Unvisited; set.len()],
    ranks: vec![None; set.len()],
  };

  visitor.visit(root)?;

  let order = Order {
    root,
    ranks: visitor.ranks,
  };

  log::trace!("sorted {} module(s) from {}: {:?}", order.reachable_count(), set[root].name(), order.ranks);

  Ok(order)
}

struct Visitor<'a> {
  set: &'a ModuleSet,
  index: HashMap<&'a str, usize>,
  marks: Vec<Mark>,
  ranks: Vec<Option<usize>>,
}

/// A module being visited: the next requirement to look at and the rank found so far.
struct Frame {
  module: usize,
  next_dep: usize,
  rank: usize,
}

impl<'a> Visitor<'a> {
  /// Depth-first walk from `root`. The path being explored lives in an explicit stack, so
  /// requirement chains can be arbitrarily long.
  fn visit(&mut self, root: usize) -> Result<usize> {
    let set = self.set;
    let mut stack = vec![Frame { module: root, next_dep: 0, rank: 0 }];
    self.marks[root] = Mark::InProgress;

    while let Some(frame) = stack.last_mut() {
      let dep = match set[frame.module].dependency_arena().get(frame.next_dep) {
        Some(dep) => dep,
        None => {
          // every requirement ranked
          let (module, rank) = (frame.module, frame.rank);
          stack.pop();

          self.marks[module] = Mark::Done;
          self.ranks[module] = Some(rank);

          if let Some(parent) = stack.last_mut() {
            parent.rank = parent.rank.max(rank + 1);
          }

          continue;
        }
      };

      frame.next_dep += 1;

      let dep_index = *self
        .index
        .get(dep)
        .ok_or_else(|| Error::new(ErrorKind::MissingDependency, dep))?;

      match self.marks[dep_index] {
        Mark::InProgress => return Err(Error::new(ErrorKind::CircularDependency, set[dep_index].name())),
        Mark::Done => frame.rank = frame.rank.max(self.ranks[dep_index].unwrap_or(0) + 1),
        Mark::Unvisited => {
          self.marks[dep_index] = Mark::InProgress;
          stack.push(Frame { module: dep_index, next_dep: 0, rank: 0 });
        }
      }
    }

    Ok(self.ranks[root].unwrap_or(0))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::module::Module;

  fn set(srcs: &[&str]) -> ModuleSet {
    ModuleSet::from_modules(srcs.iter().map(|src| Module::from_source(src).unwrap())).unwrap()
  }

  #[test]
  fn chain() {
    let set = set(&["#module main\n#require util\n", "#module util\n", "#module lonely\n"]);
    let order = sort(&set, 0).unwrap();

    assert_eq!(order.rank(0), Some(1));
    assert_eq!(order.rank(1), Some(0));
    assert_eq!(order.rank(2), None);
    assert_eq!(order.reachable_count(), 2);
    assert_eq!(order.emission_order(), vec![1, 0]);
  }

  #[test]
  fn shortcut_edges_keep_order() {
    // main requires a and b, a requires b: b must come before a even though main reaches b
    // directly
    let set = set(&["#module main\n#require a, b\n", "#module a\n#require b\n", "#module b\n"]);
    let order = sort(&set, 0).unwrap();

    assert!(order.rank(2) < order.rank(1));
    assert!(order.rank(1) < order.rank(0));
    assert_eq!(order.emission_order(), vec![2, 1, 0]);
  }

  #[test]
  fn equal_ranks_keep_set_order() {
    let set = set(&["#module z\n", "#module main\n#require z, y\n", "#module y\n"]);
    assert_eq!(sort(&set, 1).unwrap().emission_order(), vec![0, 2, 1]);
  }

  #[test]
  fn cycle() {
    let set = set(&["#module a\n#require b\n", "#module b\n#require a\n"]);
    let err = sort(&set, 0).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CircularDependency);
    assert!(err.detail() == "a" || err.detail() == "b");
  }

  #[test]
  fn longer_cycle_below_root() {
    let set = set(&[
      "#module main\n#require x\n",
      "#module x\n#require y\n",
      "#module y\n#require z\n",
      "#module z\n#require x\n",
    ]);

    assert_eq!(sort(&set, 0).unwrap_err().kind(), ErrorKind::CircularDependency);
  }

  #[test]
  fn missing_dependency_propagates() {
    let set = set(&["#module main\n#require a\n", "#module a\n#require ghost\n"]);
    let err = sort(&set, 0).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingDependency);
    assert_eq!(err.detail(), "ghost");
  }

  #[test]
  fn unreachable_broken_modules_ignored() {
    let set = set(&["#module main\n", "#module broken\n#require ghost\n"]);
    let order = sort(&set, 0).unwrap();

    assert_eq!(order.emission_order(), vec![0]);
  }

  #[test]
  fn long_chains() {
    // m0 requires m1, which requires m2, and so on
    let n = 20_000;
    let set = ModuleSet::from_modules((0..n).map(|i| {
      let src = if i + 1 < n { format!("#module m{}\n#require m{}\n", i, i + 1) } else { format!("#module m{}\n", i) };
      Module::from_source(&src).unwrap()
    })).unwrap();

    let order = sort(&set, 0).unwrap();

    assert_eq!(order.rank(0), Some(n - 1));
    assert_eq!(order.rank(n - 1), Some(0));
    assert_eq!(order.emission_order(), (0..n).rev().collect::<Vec<_>>());
  }

  #[test]
  fn sort_is_repeatable() {
    let set = set(&["#module main\n#require a\n", "#module a\n"]);
    assert_eq!(sort(&set, 0).unwrap(), sort(&set, 0).unwrap());
  }
}
