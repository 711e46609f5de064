//! Per-node statistics

use serde::{Deserialize, Serialize};

/// Cumulative traffic counters for one node
///
/// `packets_generated == packets_sent + queue_size` holds after every slot:
/// a packet is either still queued at its source or has been sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStats {
    /// Packets generated at this node since construction or reset
    pub packets_generated: u64,

    /// Packets from this node admitted onto the network
    pub packets_sent: u64,

    /// Current backlog length
    pub queue_size: usize,
}

impl NodeStats {
    /// Packets neither sent nor queued (always 0 unless an invariant broke)
    pub fn unaccounted(&self) -> i64 {
        self.packets_generated as i64 - self.packets_sent as i64 - self.queue_size as i64
    }
}
