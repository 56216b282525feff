//! Dijkstra's shortest-path search on the binomial heap
//!
//! The heap's handle registry makes the textbook formulation of Dijkstra
//! direct: each frontier node is pushed with its state as the handle, and
//! relaxing an edge is a plain `update_priority` on that handle. No
//! external handle bookkeeping is needed.
//!
//! The node type carries its own goal context and implements `is_goal()`
//! to decide when the search should stop.
//!
//! # Example
//!
//! ```rust
//! use mergeq::pathfinding::{shortest_path, SearchNode};
//!
//! // Count up from `value` toward `goal`, one step at a time.
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct Counter { value: i32, goal: i32 }
//!
//! impl SearchNode for Counter {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, u32)> {
//!         vec![(Counter { value: self.value + 1, goal: self.goal }, 1)]
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         self.value == self.goal
//!     }
//! }
//!
//! let (path, cost) = shortest_path(&Counter { value: 0, goal: 4 }).unwrap();
//! assert_eq!(cost, 4);
//! assert_eq!(path.len(), 5);
//! ```

use std::hash::Hash;
use std::ops::Add;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::binomial::BinomialHeap;

/// Edge-weight requirements: orderable, copyable, addable, with a zero
/// value for the start node. `f64` qualifies (NaN weights are rejected by
/// the heap and their edges skipped).
pub trait Cost: PartialOrd + Copy + Add<Output = Self> + Default {}

impl<T> Cost for T where T: PartialOrd + Copy + Add<Output = Self> + Default {}

/// A node in a search graph.
///
/// The node carries all context needed to generate its successors and to
/// recognize the goal (e.g. the goal coordinates, or a reference to the
/// problem instance).
pub trait SearchNode: Clone + Eq + Hash {
    /// Edge-weight type.
    type Cost: Cost;

    /// All neighbors reachable from this node with their edge costs.
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    /// True if this node is a goal state.
    fn is_goal(&self) -> bool;
}

/// Runs Dijkstra's algorithm from `start` until `is_goal()` holds.
///
/// Returns the path (start and goal inclusive) and its total cost, or
/// `None` if no goal is reachable.
pub fn shortest_path<N: SearchNode>(start: &N) -> Option<(Vec<N>, N::Cost)> {
    let mut open: BinomialHeap<N::Cost, N> = BinomialHeap::new();
    let mut best: FxHashMap<N, N::Cost> = FxHashMap::default();
    let mut came_from: FxHashMap<N, N> = FxHashMap::default();
    let mut closed: FxHashSet<N> = FxHashSet::default();

    best.insert(start.clone(), N::Cost::default());
    open.push_with_handle(N::Cost::default(), start.clone()).ok()?;

    while let Some((cost, node)) = open.pop() {
        let Some(node) = node else { continue };

        if node.is_goal() {
            return Some((reconstruct_path(&came_from, node), cost));
        }
        closed.insert(node.clone());

        for (successor, edge_cost) in node.successors() {
            if closed.contains(&successor) {
                continue;
            }
            let tentative = cost + edge_cost;
            // The heap call goes first: an unorderable cost (NaN edge)
            // must not leave a poisoned entry in `best`.
            match best.get(&successor) {
                Some(known) if !(tentative < *known) => {}
                Some(_) => {
                    if open.update_priority(&successor, tentative).is_ok() {
                        best.insert(successor.clone(), tentative);
                        came_from.insert(successor, node.clone());
                    }
                }
                None => {
                    if open.push_with_handle(tentative, successor.clone()).is_ok() {
                        best.insert(successor.clone(), tentative);
                        came_from.insert(successor, node.clone());
                    }
                }
            }
        }
    }

    None
}

fn reconstruct_path<N: SearchNode>(came_from: &FxHashMap<N, N>, goal: N) -> Vec<N> {
    let mut path = Vec::new();
    let mut current = goal;
    loop {
        path.push(current.clone());
        match came_from.get(&current) {
            Some(prev) => current = prev.clone(),
            None => break,
        }
    }
    path.reverse();
    path
}
