//! Simulation Engine
//!
//! Orchestrates one slot at a time:
//!
//! ```text
//! For each slot s:
//! 1. Resolve the slot label (explicit override or the clock's current slot)
//! 2. Reset link usage
//! 3. Generate arrivals and enqueue them at their sources
//! 4. Retry every node's backlog, in topology order
//! 5. Record queue sizes
//! 6. Advance the clock if s was the current slot
//! 7. Publish a snapshot to observers
//! ```
//!
//! The engine is synchronous and unsynchronized; callers serialize
//! `advance_slot` and `reset` (see [`crate::orchestrator::SimulatorHandle`]).
//!
//! # Example
//!
//! ```rust
//! use network_simulator_core_rs::{SimulationEngine, SimulatorConfig};
//!
//! let mut engine = SimulationEngine::new(SimulatorConfig::default()).unwrap();
//! assert_eq!(engine.current_slot(), "08:00");
//!
//! let snapshot = engine.advance_slot(None);
//! assert_eq!(snapshot.current_slot, "08:15");
//! assert_eq!(snapshot.total_generated(), 200);
//! ```

use crate::arrivals::TrafficGenerator;
use crate::core::time::SlotClock;
use crate::models::backlog::Backlog;
use crate::models::event::{Event, EventLog};
use crate::models::node::NodeStats;
use crate::models::topology::{Link, NodeId, TopologyError, TopologyGraph};
use crate::orchestrator::config::SimulatorConfig;
use crate::orchestrator::snapshot::{LinkSnapshot, Snapshot};
use crate::rng::RngManager;
use crate::routing::{CapacityLedger, PathFinder};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

// ============================================================================
// Errors
// ============================================================================

/// Engine construction errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid topology: {0}")]
    Topology(#[from] TopologyError),

    #[error("Schedule for slot {slot} references unknown node {node}")]
    UnknownScheduleNode { slot: String, node: NodeId },

    #[error("Slot sequence must not be empty")]
    EmptySlotSequence,

    #[error("Duplicate slot label: {0}")]
    DuplicateSlot(String),
}

// ============================================================================
// Observers
// ============================================================================

/// Receives every snapshot the engine publishes
///
/// Implementations must return promptly and must not fail: delivery is best
/// effort and never affects slot processing.
pub trait SnapshotObserver: Send + Sync {
    fn notify(&self, snapshot: &Snapshot);
}

// ============================================================================
// Engine
// ============================================================================

/// Slot-based packet flow simulator
///
/// # Determinism
///
/// All randomness is via `rng_manager`, seeded from the configuration and
/// reseeded on `reset()`. Same config = identical snapshot sequence.
pub struct SimulationEngine {
    topology: TopologyGraph,
    clock: SlotClock,
    generator: TrafficGenerator,
    rng_manager: RngManager,
    rng_seed: u64,

    /// Link usage for the most recent slot
    ledger: CapacityLedger,

    backlog: Backlog,
    node_stats: BTreeMap<NodeId, NodeStats>,
    event_log: EventLog,
    observers: Vec<Arc<dyn SnapshotObserver>>,

    /// Mirrors the external auto-advance driver
    auto_running: bool,
}

impl SimulationEngine {
    /// Create a new engine from configuration
    ///
    /// # Errors
    ///
    /// Returns `SimulationError` if the topology, slot sequence or schedule is
    /// invalid. No engine is built from a partially valid configuration.
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulationError> {
        Self::validate_slots(&config)?;

        let links: Vec<Link> = config.links.iter().map(Link::from).collect();
        let topology = if config.nodes.is_empty() {
            TopologyGraph::from_links(links)?
        } else {
            TopologyGraph::new(config.nodes.clone(), links)?
        };

        Self::validate_schedule(&config, &topology)?;

        if !topology.is_connected() {
            warn!(
                nodes = topology.nodes().len(),
                "topology is disconnected; packets between components stay queued"
            );
        }

        let nodes = topology.nodes().to_vec();
        let ledger = CapacityLedger::new(&topology);

        Ok(Self {
            clock: SlotClock::new(config.slots),
            generator: TrafficGenerator::new(config.schedule, nodes.clone()),
            rng_manager: RngManager::new(config.rng_seed),
            rng_seed: config.rng_seed,
            ledger,
            backlog: Backlog::new(&nodes),
            node_stats: fresh_stats(&nodes),
            event_log: EventLog::new(config.event_log_limit),
            observers: Vec::new(),
            auto_running: false,
            topology,
        })
    }

    fn validate_slots(config: &SimulatorConfig) -> Result<(), SimulationError> {
        if config.slots.is_empty() {
            return Err(SimulationError::EmptySlotSequence);
        }

        let mut seen = HashSet::new();
        for slot in &config.slots {
            if !seen.insert(slot) {
                return Err(SimulationError::DuplicateSlot(slot.clone()));
            }
        }

        Ok(())
    }

    fn validate_schedule(config: &SimulatorConfig, topology: &TopologyGraph) -> Result<(), SimulationError> {
        for (slot, counts) in &config.schedule {
            if let Some(node) = counts.keys().find(|node| !topology.contains(node)) {
                return Err(SimulationError::UnknownScheduleNode {
                    slot: slot.clone(),
                    node: node.clone(),
                });
            }
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn current_slot(&self) -> &str {
        self.clock.current_slot()
    }

    pub fn clock(&self) -> &SlotClock {
        &self.clock
    }

    pub fn topology(&self) -> &TopologyGraph {
        &self.topology
    }

    pub fn ledger(&self) -> &CapacityLedger {
        &self.ledger
    }

    pub fn backlog(&self) -> &Backlog {
        &self.backlog
    }

    pub fn node_stats(&self, node: &str) -> Option<&NodeStats> {
        self.node_stats.get(node)
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// ID the next generated packet will receive
    pub fn next_packet_id(&self) -> u64 {
        self.generator.next_packet_id()
    }

    pub fn is_auto_running(&self) -> bool {
        self.auto_running
    }

    pub(crate) fn set_auto_running(&mut self, running: bool) {
        self.auto_running = running;
    }

    /// Register an observer for every subsequently published snapshot
    pub fn add_observer(&mut self, observer: Arc<dyn SnapshotObserver>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ========================================================================
    // Slot Loop
    // ========================================================================

    /// Simulate one slot and publish the resulting snapshot
    ///
    /// `slot` overrides the clock's current slot. Unknown labels generate no
    /// arrivals but still drain the backlog. The clock only advances when the
    /// simulated slot equals the current slot.
    pub fn advance_slot(&mut self, slot: Option<&str>) -> Snapshot {
        let slot = slot.unwrap_or_else(|| self.clock.current_slot()).to_string();

        // STEP 1: FRESH CAPACITY
        self.ledger.reset();

        // STEP 2: ARRIVALS
        let arrivals = self.generator.generate_for_slot(&slot, &mut self.rng_manager);
        let num_arrivals = arrivals.len();

        for packet in arrivals {
            let source = packet.source().to_string();
            self.node_stats.entry(source.clone()).or_default().packets_generated += 1;
            self.backlog.enqueue(&source, packet);
        }

        self.event_log.log(Event::SlotStarted {
            slot: slot.clone(),
            arrivals: num_arrivals,
        });

        // STEP 3: DRAIN BACKLOGS
        let path_finder = PathFinder::new(&self.topology);
        let mut num_sent = 0;

        for node in self.topology.nodes() {
            let stats = self.node_stats.entry(node.clone()).or_default();
            let result = self
                .backlog
                .drain_attempt(node, &mut self.ledger, &path_finder, stats);
            stats.queue_size = result.remaining;
            num_sent += result.sent;

            self.event_log.log(Event::BacklogDrained {
                slot: slot.clone(),
                node: node.clone(),
                sent: result.sent,
                remaining: result.remaining,
            });
        }

        // STEP 4: ADVANCE CLOCK
        if self.clock.is_current(&slot) {
            let to = self.clock.advance().to_string();
            self.event_log.log(Event::ClockAdvanced {
                from: slot.clone(),
                to,
            });
        }

        debug!(
            slot = %slot,
            arrivals = num_arrivals,
            sent = num_sent,
            queued = self.backlog.total_len(),
            next_slot = self.clock.current_slot(),
            "slot advanced"
        );

        // STEP 5: PUBLISH
        let snapshot = self.snapshot();
        self.publish(&snapshot);
        snapshot
    }

    /// Reinitialize all state to construction-time defaults
    ///
    /// Clears backlogs, link usage and statistics, restarts packet IDs,
    /// reseeds the RNG, rewinds the clock and clears the running flag.
    /// Observers stay registered and receive the fresh snapshot.
    pub fn reset(&mut self) -> Snapshot {
        let nodes = self.topology.nodes().to_vec();

        self.ledger.reset();
        self.backlog = Backlog::new(&nodes);
        self.node_stats = fresh_stats(&nodes);
        self.generator.reset();
        self.rng_manager = RngManager::new(self.rng_seed);
        self.clock.reset();
        self.auto_running = false;

        self.event_log.clear();
        self.event_log.log(Event::SimulationReset);

        info!(slot = self.clock.current_slot(), "simulation reset");

        let snapshot = self.snapshot();
        self.publish(&snapshot);
        snapshot
    }

    /// Current state, without mutation
    pub fn snapshot(&self) -> Snapshot {
        let links = self
            .topology
            .directed_links()
            .map(|(from, to, capacity)| {
                LinkSnapshot::new(
                    from.to_string(),
                    to.to_string(),
                    capacity,
                    self.ledger.usage(from, to),
                )
            })
            .collect();

        Snapshot {
            current_slot: self.clock.current_slot().to_string(),
            slot_index: self.clock.current_index(),
            nodes: self.node_stats.clone(),
            links,
            queues: self.backlog.lengths(),
            is_running: self.auto_running,
        }
    }

    fn publish(&self, snapshot: &Snapshot) {
        for observer in &self.observers {
            observer.notify(snapshot);
        }
    }
}

fn fresh_stats(nodes: &[NodeId]) -> BTreeMap<NodeId, NodeStats> {
    nodes
        .iter()
        .map(|node| (node.clone(), NodeStats::default()))
        .collect()
}

impl std::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("current_slot", &self.current_slot())
            .field("num_nodes", &self.topology.nodes().len())
            .field("queued", &self.backlog.total_len())
            .field("event_count", &self.event_log.len())
            .field("observers", &self.observers.len())
            .field("auto_running", &self.auto_running)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
