//! Minimum-hop path search
//!
//! Uniform-cost search over the unit-weight topology. The frontier is a
//! min-heap ordered by an explicit key:
//!
//! 1. accumulated hop count
//! 2. identifier of the entry's current node (lexicographic)
//! 3. the full path so far, compared element by element
//!
//! A node is settled the first time it is popped, so among equal-length
//! routes the lexicographically smallest node sequence wins.

use crate::models::topology::{NodeId, TopologyGraph};
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, BinaryHeap};

/// Pending search state: a path ending at `node` after `hops` links
#[derive(Debug, Clone, PartialEq, Eq)]
struct FrontierEntry {
    hops: usize,
    node: NodeId,
    path: Vec<NodeId>,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hops
            .cmp(&other.hops)
            .then_with(|| self.node.cmp(&other.node))
            .then_with(|| compare_paths(&self.path, &other.path))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Element-wise path comparison; a strict prefix orders first
fn compare_paths(left: &[NodeId], right: &[NodeId]) -> Ordering {
    for (l, r) in left.iter().zip(right.iter()) {
        match l.cmp(r) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }
    left.len().cmp(&right.len())
}

/// Shortest-path search over a borrowed topology
///
/// # Example
///
/// ```rust
/// use network_simulator_core_rs::{Link, PathFinder, TopologyGraph};
///
/// let topology = TopologyGraph::from_links(vec![
///     Link::new("A", "B", 10),
///     Link::new("A", "C", 10),
///     Link::new("B", "D", 10),
///     Link::new("C", "D", 10),
/// ])
/// .unwrap();
///
/// let finder = PathFinder::new(&topology);
/// assert_eq!(finder.shortest_path("A", "D"), vec!["A", "B", "D"]);
/// assert_eq!(finder.shortest_path("C", "C"), vec!["C"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'a> {
    topology: &'a TopologyGraph,
}

impl<'a> PathFinder<'a> {
    pub fn new(topology: &'a TopologyGraph) -> Self {
        Self { topology }
    }

    /// Minimum-hop path from `source` to `destination`, inclusive of both ends
    ///
    /// Returns `[source]` when the endpoints are equal and an empty path when
    /// either endpoint is unknown or `destination` is unreachable.
    pub fn shortest_path(&self, source: &str, destination: &str) -> Vec<NodeId> {
        if !self.topology.contains(source) || !self.topology.contains(destination) {
            return Vec::new();
        }
        if source == destination {
            return vec![source.to_string()];
        }

        let mut frontier = BinaryHeap::new();
        let mut settled: BTreeSet<NodeId> = BTreeSet::new();

        frontier.push(Reverse(FrontierEntry {
            hops: 0,
            node: source.to_string(),
            path: vec![source.to_string()],
        }));

        while let Some(Reverse(entry)) = frontier.pop() {
            if !settled.insert(entry.node.clone()) {
                continue;
            }

            if entry.node == destination {
                return entry.path;
            }

            for neighbor in self.topology.neighbors(&entry.node) {
                if settled.contains(neighbor) {
                    continue;
                }
                let mut path = entry.path.clone();
                path.push(neighbor.to_string());
                frontier.push(Reverse(FrontierEntry {
                    hops: entry.hops + 1,
                    node: neighbor.to_string(),
                    path,
                }));
            }
        }

        Vec::new()
    }
}
