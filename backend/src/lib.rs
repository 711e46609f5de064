//! Network Simulator Core - Rust Engine
//!
//! Slot-based packet flow simulator over a fixed topology with finite
//! per-slot link capacity and deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Cyclic slot clock
//! - **models**: Domain types (Topology, Packet, Backlog, NodeStats, Events)
//! - **routing**: Shortest paths and capacity admission
//! - **arrivals**: Scheduled traffic generation
//! - **orchestrator**: Slot loop, configuration, snapshots, auto-advance driver
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Link usage never exceeds capacity within a slot
//! 2. Every generated packet is either queued at its source or sent
//! 3. All randomness is deterministic (seeded RNG)

// Module declarations
pub mod arrivals;
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod rng;
pub mod routing;

// Re-exports for convenience
pub use arrivals::{TrafficGenerator, TrafficSchedule};
pub use crate::core::time::SlotClock;
pub use models::{
    backlog::{Backlog, DrainResult},
    event::{Event, EventLog},
    node::NodeStats,
    packet::Packet,
    topology::{Link, NodeId, TopologyError, TopologyGraph},
};
pub use orchestrator::{
    BroadcastObserver, DriverError, LinkConfig, LinkSnapshot, SimulationEngine, SimulationError,
    SimulatorConfig, SimulatorHandle, Snapshot, SnapshotObserver,
};
pub use rng::RngManager;
pub use routing::{CapacityLedger, LinkKey, PathFinder};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn network_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::simulator::PySimulator>()?;
    Ok(())
}
