//! Traffic generation for deterministic packet creation.
//!
//! Each slot label maps to a fixed number of new packets per source node.
//! Destinations are drawn uniformly from every other node through the seeded
//! [`RngManager`], so the same seed and schedule always produce the same
//! packets.
//!
//! # Example
//!
//! ```
//! use network_simulator_core_rs::arrivals::{TrafficGenerator, TrafficSchedule};
//! use network_simulator_core_rs::rng::RngManager;
//! use std::collections::BTreeMap;
//!
//! let mut schedule = TrafficSchedule::new();
//! schedule.insert("08:00".to_string(), BTreeMap::from([("A".to_string(), 3)]));
//!
//! let nodes = vec!["A".to_string(), "B".to_string(), "C".to_string()];
//! let mut generator = TrafficGenerator::new(schedule, nodes);
//! let mut rng = RngManager::new(42);
//!
//! let packets = generator.generate_for_slot("08:00", &mut rng);
//! assert_eq!(packets.len(), 3);
//! assert!(packets.iter().all(|p| p.destination() != "A"));
//! assert!(generator.generate_for_slot("09:00", &mut rng).is_empty());
//! ```

use crate::models::packet::Packet;
use crate::models::topology::NodeId;
use crate::rng::RngManager;
use std::collections::BTreeMap;
use tracing::warn;

/// Slot label → (source node → packets generated in that slot)
pub type TrafficSchedule = BTreeMap<String, BTreeMap<NodeId, u32>>;

/// Generator for packet arrivals across all nodes.
#[derive(Debug, Clone)]
pub struct TrafficGenerator {
    schedule: TrafficSchedule,

    /// All node IDs in topology order (source iteration and destination choice)
    all_node_ids: Vec<NodeId>,

    /// Next packet ID
    next_packet_id: u64,
}

impl TrafficGenerator {
    /// Create a new traffic generator.
    ///
    /// # Arguments
    ///
    /// * `schedule` - Per-slot arrival counts
    /// * `all_node_ids` - Every node in the topology, in iteration order
    pub fn new(schedule: TrafficSchedule, all_node_ids: Vec<NodeId>) -> Self {
        Self {
            schedule,
            all_node_ids,
            next_packet_id: 0,
        }
    }

    /// Generate every arrival for `slot`, sources visited in topology order.
    ///
    /// Unknown slot labels yield no packets.
    pub fn generate_for_slot(&mut self, slot: &str, rng: &mut RngManager) -> Vec<Packet> {
        if !self.schedule.contains_key(slot) {
            return Vec::new();
        }

        let mut packets = Vec::new();
        for index in 0..self.all_node_ids.len() {
            self.emit_arrivals(index, slot, rng, &mut packets);
        }
        packets
    }

    /// Generate arrivals for a single source node in `slot`.
    ///
    /// Sources outside the topology yield no packets.
    pub fn generate_for_node(&mut self, source: &str, slot: &str, rng: &mut RngManager) -> Vec<Packet> {
        let mut packets = Vec::new();
        if let Some(index) = self.all_node_ids.iter().position(|id| id == source) {
            self.emit_arrivals(index, slot, rng, &mut packets);
        }
        packets
    }

    /// Append the scheduled arrivals of the source at `source_index`
    fn emit_arrivals(&mut self, source_index: usize, slot: &str, rng: &mut RngManager, packets: &mut Vec<Packet>) {
        let source = &self.all_node_ids[source_index];
        let count = self.arrivals_for(slot, source);
        if count == 0 {
            return;
        }

        if self.all_node_ids.len() < 2 {
            warn!(source = source.as_str(), slot, "no destination available, skipping arrivals");
            return;
        }

        packets.reserve(count as usize);
        for _ in 0..count {
            let destination = self.all_node_ids[select_destination(source_index, self.all_node_ids.len(), rng)].clone();

            let id = self.next_packet_id;
            self.next_packet_id += 1;

            packets.push(Packet::new(id, source.clone(), destination, slot.to_string()));
        }
    }

    /// Scheduled arrival count for `source` in `slot` (0 when unscheduled)
    pub fn arrivals_for(&self, slot: &str, source: &str) -> u32 {
        self.schedule
            .get(slot)
            .and_then(|counts| counts.get(source))
            .copied()
            .unwrap_or(0)
    }

    /// ID the next generated packet will receive
    pub fn next_packet_id(&self) -> u64 {
        self.next_packet_id
    }

    /// Restart packet numbering from zero
    pub fn reset(&mut self) {
        self.next_packet_id = 0;
    }

    pub fn schedule(&self) -> &TrafficSchedule {
        &self.schedule
    }
}

/// Uniformly pick a node index in `[0, num_nodes)` other than `source_index`
///
/// Draws over the `num_nodes - 1` candidates and skips past the source, which
/// is the same choice as indexing the list with the source removed.
fn select_destination(source_index: usize, num_nodes: usize, rng: &mut RngManager) -> usize {
    let pick = rng.pick_index(num_nodes - 1);
    if pick >= source_index {
        pick + 1
    } else {
        pick
    }
}
