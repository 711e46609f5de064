//! Python bindings
//!
//! Lets a Python web server embed the engine directly and relay snapshots
//! as plain dicts.

pub mod simulator;
pub mod types;
