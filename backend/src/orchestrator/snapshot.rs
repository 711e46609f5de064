//! Snapshot - read-only view of engine state
//!
//! Produced after every slot, on reset and on demand. Serializes with
//! snake_case field names for transport by the serving layer.

use crate::models::node::NodeStats;
use crate::models::topology::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Engine state at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Label of the slot the next unconditioned advance will simulate
    pub current_slot: String,

    /// Index of `current_slot` in the slot sequence
    pub slot_index: usize,

    /// Cumulative per-node counters
    pub nodes: BTreeMap<NodeId, NodeStats>,

    /// Per directed link load for the most recent slot
    pub links: Vec<LinkSnapshot>,

    /// Current backlog length per node
    pub queues: BTreeMap<NodeId, usize>,

    /// Whether auto-advance is active
    pub is_running: bool,
}

/// Load on one directed link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSnapshot {
    pub source: NodeId,
    pub destination: NodeId,
    pub capacity: u32,
    pub current_load: u32,
    pub utilization_percent: f64,
}

impl LinkSnapshot {
    pub fn new(source: NodeId, destination: NodeId, capacity: u32, current_load: u32) -> Self {
        Self {
            source,
            destination,
            capacity,
            current_load,
            utilization_percent: utilization_percent(current_load, capacity),
        }
    }
}

/// `load / capacity * 100`, rounded half-to-even to one decimal (0 for zero capacity)
///
/// # Example
///
/// ```rust
/// use network_simulator_core_rs::orchestrator::utilization_percent;
///
/// assert_eq!(utilization_percent(40, 80), 50.0);
/// assert_eq!(utilization_percent(1, 3), 33.3);
/// assert_eq!(utilization_percent(5, 0), 0.0);
/// ```
pub fn utilization_percent(load: u32, capacity: u32) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    let percent = f64::from(load) / f64::from(capacity) * 100.0;
    (percent * 10.0).round_ties_even() / 10.0
}

impl Snapshot {
    pub fn total_generated(&self) -> u64 {
        self.nodes.values().map(|s| s.packets_generated).sum()
    }

    pub fn total_sent(&self) -> u64 {
        self.nodes.values().map(|s| s.packets_sent).sum()
    }

    pub fn total_queued(&self) -> usize {
        self.queues.values().sum()
    }

    /// Load entry for the directed link `source → destination`
    pub fn link(&self, source: &str, destination: &str) -> Option<&LinkSnapshot> {
        self.links
            .iter()
            .find(|l| l.source == source && l.destination == destination)
    }
}
