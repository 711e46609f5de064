//! Per-node Backlog
//!
//! Each node holds a FIFO of packets it generated but could not yet send.
//! Every slot the engine retries each queue head-to-tail against the current
//! capacity ledger.
//!
//! # Critical Invariants
//!
//! 1. **Order preserved**: a drain only removes routed packets; the rest keep
//!    their relative order
//! 2. **No drops**: unroutable packets stay queued indefinitely
//! 3. **Exactly once**: a packet is either queued at its source or sent

use crate::models::node::NodeStats;
use crate::models::packet::Packet;
use crate::models::topology::NodeId;
use crate::routing::{CapacityLedger, PathFinder};
use std::collections::{BTreeMap, VecDeque};
use tracing::trace;

/// Outcome of retrying one node's queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainResult {
    /// Packets admitted and removed this attempt
    pub sent: usize,

    /// Packets left in the queue afterwards
    pub remaining: usize,
}

/// Per-node FIFO queues of unsent packets
#[derive(Debug, Clone, Default)]
pub struct Backlog {
    queues: BTreeMap<NodeId, VecDeque<Packet>>,
}

impl Backlog {
    /// Create empty queues for `nodes`
    pub fn new(nodes: &[NodeId]) -> Self {
        Self {
            queues: nodes
                .iter()
                .map(|node| (node.clone(), VecDeque::new()))
                .collect(),
        }
    }

    /// Append `packet` to the tail of `node`'s queue
    pub fn enqueue(&mut self, node: &str, packet: Packet) {
        match self.queues.get_mut(node) {
            Some(queue) => queue.push_back(packet),
            None => {
                self.queues
                    .insert(node.to_string(), VecDeque::from([packet]));
            }
        }
    }

    /// Retry every packet queued at `node`, head to tail
    ///
    /// A packet leaves the queue only when its whole shortest path is admitted
    /// by `ledger`; capacity is then reserved and `stats.packets_sent`
    /// incremented. Packets with no path or a saturated hop stay in place.
    ///
    /// # Example
    ///
    /// ```rust
    /// use network_simulator_core_rs::{Backlog, CapacityLedger, Link, NodeStats, Packet, PathFinder, TopologyGraph};
    ///
    /// let topology = TopologyGraph::from_links(vec![Link::new("A", "B", 1)]).unwrap();
    /// let mut ledger = CapacityLedger::new(&topology);
    /// let finder = PathFinder::new(&topology);
    /// let mut backlog = Backlog::new(topology.nodes());
    /// let mut stats = NodeStats::default();
    ///
    /// for id in 0..3 {
    ///     backlog.enqueue("A", Packet::new(id, "A".into(), "B".into(), "08:00".into()));
    /// }
    ///
    /// let result = backlog.drain_attempt("A", &mut ledger, &finder, &mut stats);
    /// assert_eq!(result.sent, 1);
    /// assert_eq!(result.remaining, 2);
    /// assert_eq!(stats.packets_sent, 1);
    /// ```
    pub fn drain_attempt(
        &mut self,
        node: &str,
        ledger: &mut CapacityLedger,
        path_finder: &PathFinder<'_>,
        stats: &mut NodeStats,
    ) -> DrainResult {
        let Some(queue) = self.queues.get_mut(node) else {
            return DrainResult::default();
        };

        let pending = std::mem::take(queue);
        let mut sent = 0;

        for packet in pending {
            let path = path_finder.shortest_path(packet.source(), packet.destination());

            if path.len() >= 2 && ledger.try_reserve(&path) {
                trace!(packet_id = packet.id(), hops = path.len() - 1, "packet routed");
                stats.packets_sent += 1;
                sent += 1;
            } else {
                trace!(packet_id = packet.id(), path_len = path.len(), "packet held");
                queue.push_back(packet);
            }
        }

        DrainResult {
            sent,
            remaining: queue.len(),
        }
    }

    /// Queue length at `node` (0 for unknown nodes)
    pub fn len(&self, node: &str) -> usize {
        self.queues.get(node).map_or(0, VecDeque::len)
    }

    /// Total packets queued across all nodes
    pub fn total_len(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Packets queued at `node`, head first
    pub fn queue(&self, node: &str) -> impl Iterator<Item = &Packet> + '_ {
        self.queues.get(node).into_iter().flatten()
    }

    /// Queue length per node
    pub fn lengths(&self) -> BTreeMap<NodeId, usize> {
        self.queues
            .iter()
            .map(|(node, queue)| (node.clone(), queue.len()))
            .collect()
    }

    /// Empty every queue, keeping the node set
    pub fn clear(&mut self) {
        self.queues.values_mut().for_each(VecDeque::clear);
    }
}
