//! Packet model
//!
//! A packet is created by the traffic generator at its source node and waits
//! in that node's backlog until its whole path can be admitted in one slot.
//! Packets are immutable once created.

use crate::models::topology::NodeId;
use serde::{Deserialize, Serialize};

/// A unit of traffic travelling from `source` to `destination`
///
/// # Example
///
/// ```rust
/// use network_simulator_core_rs::Packet;
///
/// let packet = Packet::new(7, "A".to_string(), "D".to_string(), "08:00".to_string());
/// assert_eq!(packet.id(), 7);
/// assert_eq!(packet.source(), "A");
/// assert_eq!(packet.destination(), "D");
/// assert_eq!(packet.created_slot(), "08:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// Unique, monotonically increasing across the run
    id: u64,
    source: NodeId,
    destination: NodeId,
    /// Label of the slot in which the packet was generated
    created_slot: String,
}

impl Packet {
    /// Create a new packet
    ///
    /// # Panics
    ///
    /// Panics if `source == destination`
    pub fn new(id: u64, source: NodeId, destination: NodeId, created_slot: String) -> Self {
        assert!(
            source != destination,
            "destination must differ from source"
        );

        Self {
            id,
            source,
            destination,
            created_slot,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn created_slot(&self) -> &str {
        &self.created_slot
    }
}
