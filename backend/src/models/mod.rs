//! Domain models for the network simulator

pub mod backlog;
pub mod event;
pub mod node;
pub mod packet;
pub mod topology;

// Re-exports
pub use backlog::{Backlog, DrainResult};
pub use event::{Event, EventLog};
pub use node::NodeStats;
pub use packet::Packet;
pub use topology::{Link, NodeId, TopologyError, TopologyGraph};
