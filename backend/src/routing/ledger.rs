//! Capacity Ledger
//!
//! Per-slot usage of every directed link against the link's capacity.
//! Both directions of a link draw on their own counter, each bounded by the
//! link's full capacity.

use crate::models::topology::{NodeId, TopologyGraph};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Directed link identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkKey {
    pub from: NodeId,
    pub to: NodeId,
}

impl LinkKey {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Usage of each directed link within the active slot
///
/// # Example
///
/// ```rust
/// use network_simulator_core_rs::{CapacityLedger, Link, TopologyGraph};
///
/// let topology = TopologyGraph::from_links(vec![Link::new("A", "B", 1)]).unwrap();
/// let mut ledger = CapacityLedger::new(&topology);
/// let path = vec!["A".to_string(), "B".to_string()];
///
/// assert!(ledger.try_reserve(&path));
/// assert!(!ledger.can_admit(&path)); // A→B saturated for this slot
///
/// ledger.reset();
/// assert!(ledger.can_admit(&path));
/// ```
#[derive(Debug, Clone)]
pub struct CapacityLedger {
    capacity: BTreeMap<LinkKey, u32>,
    usage: BTreeMap<LinkKey, u32>,
}

impl CapacityLedger {
    /// Create a ledger with zero usage on every directed link of `topology`
    pub fn new(topology: &TopologyGraph) -> Self {
        let capacity: BTreeMap<LinkKey, u32> = topology
            .directed_links()
            .map(|(from, to, capacity)| (LinkKey::new(from, to), capacity))
            .collect();
        let usage = capacity.keys().map(|key| (key.clone(), 0)).collect();

        Self { capacity, usage }
    }

    /// Zero every usage counter (start of a new slot)
    pub fn reset(&mut self) {
        self.usage.values_mut().for_each(|used| *used = 0);
    }

    /// Check every hop of `path` has spare capacity
    ///
    /// Hops between non-adjacent nodes have capacity 0 and never admit.
    pub fn can_admit(&self, path: &[NodeId]) -> bool {
        path.windows(2).all(|hop| {
            let key = LinkKey::new(hop[0].as_str(), hop[1].as_str());
            self.usage_of(&key) < self.capacity_of(&key)
        })
    }

    /// Consume one unit of capacity on every hop of `path`
    ///
    /// Callers must have checked `can_admit` for the same path in this slot.
    pub fn reserve(&mut self, path: &[NodeId]) {
        debug_assert!(self.can_admit(path), "reserve without admission");
        for hop in path.windows(2) {
            let key = LinkKey::new(hop[0].as_str(), hop[1].as_str());
            if let Some(used) = self.usage.get_mut(&key) {
                *used += 1;
            }
        }
    }

    /// Admit and reserve `path` in one step; nothing changes when it returns false
    pub fn try_reserve(&mut self, path: &[NodeId]) -> bool {
        if !self.can_admit(path) {
            return false;
        }
        self.reserve(path);
        true
    }

    /// Current usage of the directed link `from → to`
    pub fn usage(&self, from: &str, to: &str) -> u32 {
        self.usage_of(&LinkKey::new(from, to))
    }

    /// Capacity of the directed link `from → to`
    pub fn capacity(&self, from: &str, to: &str) -> u32 {
        self.capacity_of(&LinkKey::new(from, to))
    }

    /// Capacity left on `from → to` this slot
    pub fn remaining(&self, from: &str, to: &str) -> u32 {
        self.capacity(from, to).saturating_sub(self.usage(from, to))
    }

    /// Sum of usage across all directed links
    pub fn total_usage(&self) -> u64 {
        self.usage.values().map(|used| u64::from(*used)).sum()
    }

    /// Usage per directed link, in key order
    pub fn entries(&self) -> impl Iterator<Item = (&LinkKey, u32)> + '_ {
        self.usage.iter().map(|(key, used)| (key, *used))
    }

    fn usage_of(&self, key: &LinkKey) -> u32 {
        self.usage.get(key).copied().unwrap_or(0)
    }

    fn capacity_of(&self, key: &LinkKey) -> u32 {
        self.capacity.get(key).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::topology::Link;

    fn path(nodes: &[&str]) -> Vec<NodeId> {
        nodes.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_directions_tracked_independently() {
        let topology = TopologyGraph::from_links(vec![Link::new("A", "B", 1)]).unwrap();
        let mut ledger = CapacityLedger::new(&topology);

        assert!(ledger.try_reserve(&path(&["A", "B"])));
        assert!(ledger.try_reserve(&path(&["B", "A"])));
        assert_eq!(ledger.usage("A", "B"), 1);
        assert_eq!(ledger.usage("B", "A"), 1);
    }

    #[test]
    fn test_non_adjacent_hop_never_admits() {
        let topology = TopologyGraph::from_links(vec![Link::new("A", "B", 5), Link::new("B", "C", 5)]).unwrap();
        let ledger = CapacityLedger::new(&topology);
        assert!(!ledger.can_admit(&path(&["A", "C"])));
    }

    #[test]
    fn test_single_node_path_reserves_nothing() {
        let topology = TopologyGraph::from_links(vec![Link::new("A", "B", 5)]).unwrap();
        let mut ledger = CapacityLedger::new(&topology);
        assert!(ledger.try_reserve(&path(&["A"])));
        assert_eq!(ledger.total_usage(), 0);
    }
}
