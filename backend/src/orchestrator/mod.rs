//! Orchestrator - slot loop, configuration and serving-layer boundary
//!
//! See `engine.rs` for the slot loop and `driver.rs` for auto-advance.

pub mod config;
pub mod driver;
pub mod engine;
pub mod snapshot;

pub use config::{LinkConfig, SimulatorConfig, DEFAULT_EVENT_LOG_LIMIT, DEFAULT_RNG_SEED};
pub use driver::{BroadcastObserver, DriverError, SimulatorHandle};
pub use engine::{SimulationEngine, SimulationError, SnapshotObserver};
pub use snapshot::{utilization_percent, LinkSnapshot, Snapshot};
