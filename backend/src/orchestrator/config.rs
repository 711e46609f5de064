//! Simulator Configuration
//!
//! Construction-time inputs: topology, cyclic slot sequence, traffic schedule
//! and RNG seed. Immutable once an engine is built from it.
//!
//! `SimulatorConfig::default()` is the reference five-node network.

use crate::arrivals::TrafficSchedule;
use crate::models::topology::{Link, NodeId};
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default RNG seed
pub const DEFAULT_RNG_SEED: u64 = 12345;

/// Default bound on retained events
pub const DEFAULT_EVENT_LOG_LIMIT: usize = 10_000;

/// One undirected link of the topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub a: NodeId,
    pub b: NodeId,
    /// Packets per slot, per direction
    pub capacity: u32,
}

impl From<&LinkConfig> for Link {
    fn from(config: &LinkConfig) -> Self {
        Link::new(config.a.clone(), config.b.clone(), config.capacity)
    }
}

/// Complete simulator configuration
///
/// # Example
///
/// ```rust
/// use network_simulator_core_rs::SimulatorConfig;
///
/// let config = SimulatorConfig::from_json_str(r#"{
///     "links": [{"a": "X", "b": "Y", "capacity": 3}],
///     "slots": ["t0", "t1"],
///     "schedule": {"t0": {"X": 5}}
/// }"#).unwrap();
///
/// assert!(config.nodes.is_empty()); // derived from links at construction
/// assert_eq!(config.rng_seed, 12345);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Node order; derived from links in first-appearance order when empty
    #[serde(default)]
    pub nodes: Vec<NodeId>,

    pub links: Vec<LinkConfig>,

    /// Cyclic slot labels, distinct
    pub slots: Vec<String>,

    #[serde(default)]
    pub schedule: TrafficSchedule,

    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,

    #[serde(default = "default_event_log_limit")]
    pub event_log_limit: usize,
}

fn default_rng_seed() -> u64 {
    DEFAULT_RNG_SEED
}

fn default_event_log_limit() -> usize {
    DEFAULT_EVENT_LOG_LIMIT
}

impl SimulatorConfig {
    /// Parse a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| SimulationError::InvalidConfig(e.to_string()))
    }

    /// Render as pretty-printed JSON
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn with_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        let link = |a: &str, b: &str, capacity: u32| LinkConfig {
            a: a.to_string(),
            b: b.to_string(),
            capacity,
        };
        let counts = |values: [u32; 5]| -> BTreeMap<NodeId, u32> {
            ["A", "B", "C", "D", "E"]
                .iter()
                .map(|n| n.to_string())
                .zip(values)
                .collect()
        };

        let slots: Vec<String> = ["08:00", "08:15", "08:30", "08:45"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut schedule = TrafficSchedule::new();
        schedule.insert("08:00".to_string(), counts([50, 30, 40, 20, 60]));
        schedule.insert("08:15".to_string(), counts([55, 35, 45, 25, 65]));
        schedule.insert("08:30".to_string(), counts([60, 40, 50, 30, 70]));
        schedule.insert("08:45".to_string(), counts([55, 35, 45, 25, 65]));

        Self {
            nodes: ["A", "B", "C", "D", "E"].iter().map(|n| n.to_string()).collect(),
            links: vec![
                link("A", "B", 100),
                link("A", "C", 80),
                link("B", "D", 70),
                link("C", "D", 90),
                link("C", "E", 100),
                link("D", "E", 60),
            ],
            slots,
            schedule,
            rng_seed: DEFAULT_RNG_SEED,
            event_log_limit: DEFAULT_EVENT_LOG_LIMIT,
        }
    }
}
