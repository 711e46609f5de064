//! Network Topology
//!
//! Static undirected graph of named nodes joined by capacity-limited links.
//!
//! # Determinism
//!
//! - Node order is the configured order (drives per-slot backlog iteration)
//! - Adjacency uses `BTreeMap`/`BTreeSet` so neighbor iteration is sorted
//!
//! # Critical Invariants
//!
//! 1. **Symmetric capacity**: `capacity_of(a, b) == capacity_of(b, a)`
//! 2. **Known endpoints**: every link joins two distinct configured nodes
//! 3. **Positive capacity**: every configured link carries at least one packet per slot
//! 4. **Immutable**: nothing changes after construction

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use thiserror::Error;

/// Node identifier
pub type NodeId = String;

/// Errors raised while building a topology
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TopologyError {
    #[error("Topology needs at least two nodes, got {0}")]
    TooFewNodes(usize),

    #[error("Duplicate node: {0}")]
    DuplicateNode(NodeId),

    #[error("Link {a}-{b} references unknown node {node}")]
    UnknownNode { a: NodeId, b: NodeId, node: NodeId },

    #[error("Link {a}-{b} must have positive capacity, got {capacity}")]
    InvalidCapacity { a: NodeId, b: NodeId, capacity: u32 },

    #[error("Duplicate link: {a}-{b}")]
    DuplicateLink { a: NodeId, b: NodeId },

    #[error("Link from {0} to itself")]
    SelfLoop(NodeId),
}

/// Undirected link with a per-slot packet capacity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub a: NodeId,
    pub b: NodeId,
    pub capacity: u32,
}

impl Link {
    pub fn new(a: impl Into<NodeId>, b: impl Into<NodeId>, capacity: u32) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            capacity,
        }
    }
}

/// Immutable network topology
///
/// # Example
///
/// ```rust
/// use network_simulator_core_rs::{Link, TopologyGraph};
///
/// let topology = TopologyGraph::from_links(vec![
///     Link::new("A", "B", 100),
///     Link::new("B", "C", 50),
/// ])
/// .unwrap();
///
/// assert_eq!(topology.capacity_of("B", "A"), 100);
/// assert_eq!(topology.capacity_of("A", "C"), 0);
/// assert_eq!(topology.neighbors("B").collect::<Vec<_>>(), vec!["A", "C"]);
/// ```
#[derive(Debug, Clone)]
pub struct TopologyGraph {
    /// Nodes in configured order
    nodes: Vec<NodeId>,

    /// Links in configured order and orientation
    links: Vec<Link>,

    /// node → sorted neighbor set
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,

    /// (from, to) → capacity, stored for both orientations
    capacities: BTreeMap<(NodeId, NodeId), u32>,
}

impl TopologyGraph {
    /// Build a topology from an explicit node list and links
    ///
    /// # Errors
    ///
    /// Fails if fewer than two nodes are given, a node is listed twice, or a
    /// link is a self-loop, a duplicate, has zero capacity or references an
    /// unknown node.
    pub fn new(nodes: Vec<NodeId>, links: Vec<Link>) -> Result<Self, TopologyError> {
        if nodes.len() < 2 {
            return Err(TopologyError::TooFewNodes(nodes.len()));
        }

        let mut adjacency: BTreeMap<NodeId, BTreeSet<NodeId>> = BTreeMap::new();
        for node in &nodes {
            if adjacency.insert(node.clone(), BTreeSet::new()).is_some() {
                return Err(TopologyError::DuplicateNode(node.clone()));
            }
        }

        let mut capacities = BTreeMap::new();
        for link in &links {
            for endpoint in [&link.a, &link.b] {
                if !adjacency.contains_key(endpoint) {
                    return Err(TopologyError::UnknownNode {
                        a: link.a.clone(),
                        b: link.b.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
            if link.a == link.b {
                return Err(TopologyError::SelfLoop(link.a.clone()));
            }
            if link.capacity == 0 {
                return Err(TopologyError::InvalidCapacity {
                    a: link.a.clone(),
                    b: link.b.clone(),
                    capacity: link.capacity,
                });
            }
            if capacities.contains_key(&(link.a.clone(), link.b.clone())) {
                return Err(TopologyError::DuplicateLink {
                    a: link.a.clone(),
                    b: link.b.clone(),
                });
            }

            capacities.insert((link.a.clone(), link.b.clone()), link.capacity);
            capacities.insert((link.b.clone(), link.a.clone()), link.capacity);

            if let Some(neighbors) = adjacency.get_mut(&link.a) {
                neighbors.insert(link.b.clone());
            }
            if let Some(neighbors) = adjacency.get_mut(&link.b) {
                neighbors.insert(link.a.clone());
            }
        }

        Ok(Self {
            nodes,
            links,
            adjacency,
            capacities,
        })
    }

    /// Build a topology whose nodes are the link endpoints in first-appearance order
    pub fn from_links(links: Vec<Link>) -> Result<Self, TopologyError> {
        let mut nodes: Vec<NodeId> = Vec::new();
        for link in &links {
            for endpoint in [&link.a, &link.b] {
                if !nodes.contains(endpoint) {
                    nodes.push(endpoint.clone());
                }
            }
        }
        Self::new(nodes, links)
    }

    /// Nodes in configured order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Links in configured order
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn contains(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Neighbors of `node` in sorted order (empty for unknown nodes)
    pub fn neighbors<'a>(&'a self, node: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.adjacency
            .get(node)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Capacity of the link between `a` and `b`, or 0 if they are not adjacent
    pub fn capacity_of(&self, a: &str, b: &str) -> u32 {
        self.capacities
            .get(&(a.to_string(), b.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Every directed pair with its capacity: each link as (a, b) then (b, a)
    pub fn directed_links(&self) -> impl Iterator<Item = (&str, &str, u32)> + '_ {
        self.links.iter().flat_map(|link| {
            [
                (link.a.as_str(), link.b.as_str(), link.capacity),
                (link.b.as_str(), link.a.as_str(), link.capacity),
            ]
        })
    }

    /// Check whether every node is reachable from every other node
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.nodes.first() else {
            return true;
        };

        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut frontier = VecDeque::from([start.as_str()]);
        seen.insert(start.as_str());

        while let Some(node) = frontier.pop_front() {
            for neighbor in self.neighbors(node) {
                if seen.insert(neighbor) {
                    frontier.push_back(neighbor);
                }
            }
        }

        seen.len() == self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_link_either_orientation_rejected() {
        let result = TopologyGraph::from_links(vec![Link::new("A", "B", 10), Link::new("B", "A", 20)]);
        assert_eq!(
            result.unwrap_err(),
            TopologyError::DuplicateLink {
                a: "B".to_string(),
                b: "A".to_string()
            }
        );
    }

    #[test]
    fn test_isolated_node_breaks_connectivity() {
        let topology = TopologyGraph::new(
            vec!["A".to_string(), "B".to_string(), "Z".to_string()],
            vec![Link::new("A", "B", 1)],
        )
        .unwrap();
        assert!(!topology.is_connected());
        assert_eq!(topology.neighbors("Z").count(), 0);
    }
}
